use crate::codec;
use crate::connection::Connection;
use crate::state::RunState;
use std::sync::Arc;
#[allow(unused)]
use tracing::{debug, trace};

/// One endpoint's connection together with the accounts its calls move funds between.
#[derive(Debug)]
pub struct EndpointBinding<C> {
    conn: C,
    from: String,
    to: String,
}

impl<C> EndpointBinding<C> {
    pub fn new(conn: C, from: &str, to: &str) -> Self {
        Self {
            conn,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn recipient(&self) -> &str {
        &self.to
    }
}

/// One request/response round-trip on `conn`.
///
/// No retry and no timeout: the call lasts as long as the node takes to answer. Any I/O error is
/// a failed call, never a panic or an error returned to the caller.
pub async fn send_once<C: Connection + Sync>(conn: &C, from: &str, to: &str) -> bool {
    let request = codec::encode(from, to);
    codec::exchange(conn, &request).await
}

/// A worker's handle on its endpoint and the run counters.
pub struct Sender<C> {
    binding: Arc<EndpointBinding<C>>,
    state: Arc<RunState>,
}

impl<C> Clone for Sender<C> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C: Connection + Sync> Sender<C> {
    pub fn new(binding: Arc<EndpointBinding<C>>, state: Arc<RunState>) -> Self {
        Self { binding, state }
    }

    /// Performs one call and bumps exactly one of the run counters.
    pub async fn send(&self) -> bool {
        let binding = &self.binding;
        let success = send_once(binding.connection(), binding.sender(), binding.recipient()).await;
        trace!(success, "Call finished");
        self.state.record(success);
        success
    }
}
