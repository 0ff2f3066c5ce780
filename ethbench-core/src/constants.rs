use std::time::Duration;

/// JSON-RPC method issued for every work item.
pub const METHOD: &str = "personal_sendTransaction";

pub const GAS: &str = "0x5208";
pub const GAS_PRICE: &str = "0x4a817c800";
pub const VALUE: &str = "0xde0b6b3a7640000";

/// Number of bytes read back per call. A successful node answer for `id:1` is exactly this long.
pub const RESPONSE_BUFFER_SIZE: usize = 102;

/// A response counts as a success if its first `RESPONSE_BUFFER_SIZE` bytes contain this marker.
pub const SUCCESS_MARKER: &str = r#""result":"0x"#;

pub const DEFAULT_RECIPIENT: &str = "0x00E3d1Aa965aAfd61217635E5f99f7c1e567978f";

pub const DEFAULT_CONCURRENCY: usize = 10;

pub const DEFAULT_NUMBER: u64 = 100;

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);
