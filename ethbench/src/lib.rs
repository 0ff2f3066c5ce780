//! Transaction load generator for Ethereum nodes reachable over IPC sockets.
//!
//! Each endpoint gets a pool of senders sharing one connection. Senders pull work items off a
//! queue and issue `personal_sendTransaction` calls until the work runs out, the configured
//! duration elapses, or the run is interrupted. A reporter logs throughput while the run is in
//! progress and the coordinator produces a single final report.
pub mod cli;
pub mod codec;
pub mod connection;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod reporter;
pub mod sender;
pub mod state;
pub mod work;

pub use cli::Cli;
pub use connection::{Connection, Connector, IpcConnection, IpcConnector};
pub use coordinator::{run, FinalReport};
pub use engine::{DispatchEngine, EngineHandle};
pub use error::{RunError, TransportError};
pub use state::RunState;

pub mod prelude {
    pub use crate::coordinator::run;
    pub use crate::IpcConnector;
    pub use ethbench_core::{DispatchMode, RunConfig, RunStatistics, TerminationCause};
}
