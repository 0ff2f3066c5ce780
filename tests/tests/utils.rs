use mock_service::{MockConfig, MockNode};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter("ethbench=debug,mock_service=debug")
            .try_init();
    });
}

/// A mock node listening in its own temporary directory. The directory lives as long as this.
#[allow(unused)]
pub struct TestNode {
    pub path: PathBuf,
    pub node: Arc<MockNode>,
    _dir: TempDir,
}

#[allow(unused)]
pub fn spawn_node(config: MockConfig) -> TestNode {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jsonrpc.ipc");
    let node = mock_service::spawn(&path, config).unwrap();
    TestNode {
        path,
        node,
        _dir: dir,
    }
}
