//! A stand-in Ethereum node answering JSON-RPC over a Unix socket.
use anyhow::Context;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn, Instrument};

const SEND_TRANSACTION: &str = "personal_sendTransaction";
const READ_CHUNK: usize = 4096;

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Time taken to answer each request.
    pub latency: Duration,
    /// Standard deviation of the answer time around `latency`.
    pub jitter: Option<Duration>,
    /// Probability in `[0, 1]` that a request is answered with an error.
    pub failure_rate: f64,
    /// Requests beyond this rate are answered with an error.
    pub max_tps: Option<NonZeroU32>,
}

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
}

/// Shared state of one mock node: its behaviour knobs and what it has served so far.
pub struct MockNode {
    latency: Duration,
    jitter: Option<Normal<f64>>,
    failure_rate: f64,
    limiter: Option<DefaultDirectRateLimiter>,
    window: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl MockNode {
    pub fn new(config: MockConfig) -> anyhow::Result<Self> {
        let jitter = config
            .jitter
            .map(|jitter| {
                Normal::new(config.latency.as_secs_f64(), jitter.as_secs_f64())
                    .context("Invalid latency jitter")
            })
            .transpose()?;

        anyhow::ensure!(
            (0.0..=1.0).contains(&config.failure_rate),
            "Failure rate must be within [0, 1], got {}",
            config.failure_rate
        );

        Ok(Self {
            latency: config.latency,
            jitter,
            failure_rate: config.failure_rate,
            limiter: config.max_tps.map(rate_limiter),
            window: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        })
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn delay(&self) -> Duration {
        match &self.jitter {
            Some(normal) => {
                let secs = normal.sample(&mut rand::thread_rng());
                Duration::from_secs_f64(secs.max(0.))
            }
            None => self.latency,
        }
    }

    /// Decides whether this request fails, and why.
    fn rejection(&self) -> Option<&'static str> {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                return Some("rate limit exceeded");
            }
        }
        if self.failure_rate > 0. && rand::thread_rng().gen_bool(self.failure_rate) {
            return Some("transaction rejected");
        }
        None
    }

    async fn answer(&self, request: Result<Request, serde_json::Error>) -> Vec<u8> {
        self.window.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.delay()).await;

        let (id, rejection) = match request {
            Ok(request) if request.method == SEND_TRANSACTION => (request.id, self.rejection()),
            Ok(request) => {
                debug!("Unsupported method {}", request.method);
                (request.id, Some("method not supported"))
            }
            Err(err) => {
                debug!("Invalid request: {err}");
                (Value::Null, Some("invalid request"))
            }
        };

        match rejection {
            Some(message) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                error_response(&id, message)
            }
            None => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                success_response(&id)
            }
        }
    }
}

/// `{"jsonrpc":"2.0","result":"0x<hash>","id":<id>}`, 102 bytes when the id is a single digit.
pub fn success_response(id: &Value) -> Vec<u8> {
    let hash: String = rand::thread_rng()
        .gen::<[u8; 32]>()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    format!(r#"{{"jsonrpc":"2.0","result":"0x{hash}","id":{id}}}"#).into_bytes()
}

pub fn error_response(id: &Value, message: &str) -> Vec<u8> {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "code": -32000, "message": message },
        "id": id,
    });
    body.to_string().into_bytes()
}

pub fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps))
}

/// Binds `path`, replacing a stale socket file left behind by a previous run.
pub fn bind(path: &Path) -> anyhow::Result<UnixListener> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Unable to remove stale socket {}", path.display()))?;
    }
    UnixListener::bind(path).with_context(|| format!("Unable to bind {}", path.display()))
}

/// Binds `path` and serves it from a background task, returning the node's shared state.
pub fn spawn(path: &Path, config: MockConfig) -> anyhow::Result<Arc<MockNode>> {
    let listener = bind(path)?;
    let node = Arc::new(MockNode::new(config)?);
    tokio::spawn(serve(listener, node.clone()));
    Ok(node)
}

/// Binds `path` and serves it until the process exits, logging served TPS every second.
pub async fn run(path: &Path, config: MockConfig) -> anyhow::Result<()> {
    let listener = bind(path)?;
    let node = Arc::new(MockNode::new(config)?);
    info!("Listening on {}", path.display());

    tokio::spawn(tps_measure_task(node.clone()));
    serve(listener, node).await;
    Ok(())
}

pub async fn serve(listener: UnixListener, node: Arc<MockNode>) {
    let mut next_id = 0u64;
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                next_id += 1;
                let span = tracing::debug_span!("connection", id = next_id);
                tokio::spawn(handle_connection(stream, node.clone()).instrument(span));
            }
            Err(err) => {
                error!("Accept failed: {err}");
                return;
            }
        }
    }
}

/// Answers every request on `stream` until the client hangs up.
///
/// Requests may arrive split across reads or several to a read. Each one is answered from its own
/// task, so answers can overtake each other, just as they can with a real node.
pub async fn handle_connection(stream: UnixStream, node: Arc<MockNode>) {
    let (mut reader, writer) = stream.into_split();
    let writer = Arc::new(Mutex::new(writer));
    let mut pending: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                debug!("Read failed: {err}");
                break;
            }
        };
        pending.extend_from_slice(&chunk[..n]);

        let mut values = serde_json::Deserializer::from_slice(&pending).into_iter::<Value>();
        let mut corrupt = false;
        for value in values.by_ref() {
            match value {
                Ok(value) => {
                    let request = serde_json::from_value::<Request>(value);
                    tokio::spawn(respond(node.clone(), writer.clone(), request).in_current_span());
                }
                Err(err) if err.is_eof() => break,
                Err(err) => {
                    warn!("Malformed request stream: {err}");
                    corrupt = true;
                    break;
                }
            }
        }

        if corrupt {
            pending.clear();
        } else {
            let consumed = values.byte_offset();
            pending.drain(..consumed);
        }
    }
    debug!("Client disconnected");
}

async fn respond(
    node: Arc<MockNode>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
    request: Result<Request, serde_json::Error>,
) {
    let response = node.answer(request).await;
    if let Err(err) = writer.lock().await.write_all(&response).await {
        debug!("Write failed: {err}");
    }
}

pub async fn tps_measure_task(node: Arc<MockNode>) {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let transactions = node.window.swap(0, Ordering::Relaxed);
        info!("{transactions} TPS");
    }
}
