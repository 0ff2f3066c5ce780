//! Request envelope and response recognition.
//!
//! Recognition is a substring test on the first bytes of the reply, not a JSON parse: truncated or
//! garbled frames count as successes as long as the marker made it into the buffer.
use crate::connection::Connection;
use ethbench_core::{GAS, GAS_PRICE, METHOD, RESPONSE_BUFFER_SIZE, SUCCESS_MARKER, VALUE};
#[allow(unused)]
use tracing::{debug, trace};

/// Formats the `personal_sendTransaction` call. Identities are inserted verbatim.
pub fn encode(from: &str, to: &str) -> Vec<u8> {
    format!(
        r#"{{"jsonrpc":"2.0","method":"{METHOD}","params":[{{"from":"{from}","to":"{to}","gas":"{GAS}","gasPrice":"{GAS_PRICE}","value":"{VALUE}"}},""],"id":1}}"#
    )
    .into_bytes()
}

pub fn is_success(response: &[u8]) -> bool {
    String::from_utf8_lossy(response).contains(SUCCESS_MARKER)
}

/// Sends `request` and reports whether the bounded reply carried the success marker.
///
/// Transport errors and a closed stream are failures. Bytes beyond `RESPONSE_BUFFER_SIZE` are
/// left on the wire.
pub async fn exchange<C: Connection + Sync>(conn: &C, request: &[u8]) -> bool {
    let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
    match conn.round_trip(request, &mut buf).await {
        Ok(0) => {
            debug!("Connection closed by peer");
            false
        }
        Ok(n) => is_success(&buf[..n]),
        Err(error) => {
            debug!("{error}");
            false
        }
    }
}
