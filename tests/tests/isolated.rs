mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use ethbench::prelude::*;
    use ethbench::RunError;
    use ethbench_core::ConfigError;
    use mock_service::MockConfig;
    use std::future::pending;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(paths: Vec<PathBuf>, concurrency: usize, mode: DispatchMode) -> RunConfig {
        let senders = (0..paths.len()).map(|i| format!("0x{i:040x}")).collect();
        RunConfig::new(paths, senders, ethbench_core::DEFAULT_RECIPIENT)
            .unwrap()
            .concurrency(concurrency)
            .mode(mode)
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn count_mode_every_call_succeeds() {
        init();
        let node = spawn_node(MockConfig {
            latency: Duration::from_millis(1),
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(vec![node.path.clone()], 4, DispatchMode::Count(200)),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats.cause, TerminationCause::WorkExhausted);
        assert_eq!(stats.succeeded, 200);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.success_rate(), 1.);
        assert_eq!(node.node.succeeded(), 200);
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn failures_are_counted_not_fatal() {
        init();
        let node = spawn_node(MockConfig {
            failure_rate: 0.5,
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(vec![node.path.clone()], 1, DispatchMode::Count(300)),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats.total(), 300);
        assert_eq!(stats.succeeded, node.node.succeeded());
        assert_eq!(stats.failed, node.node.failed());
        assert!(stats.failed > 0);
        assert!(stats.succeeded > 0);
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn total_failure_reports_zero_rate() {
        init();
        let node = spawn_node(MockConfig {
            failure_rate: 1.0,
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(vec![node.path.clone()], 1, DispatchMode::Count(100)),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 100);
        assert_eq!(stats.success_rate(), 0.);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ntest::timeout(20_000)]
    async fn concurrent_senders_complete_on_short_failure_replies() {
        init();
        let node = spawn_node(MockConfig {
            failure_rate: 1.0,
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(vec![node.path.clone()], 8, DispatchMode::Count(2_000)),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats.cause, TerminationCause::WorkExhausted);
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 2_000);
        assert_eq!(node.node.failed(), 2_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ntest::timeout(20_000)]
    async fn concurrent_senders_count_mixed_replies_exactly() {
        init();
        let node = spawn_node(MockConfig {
            failure_rate: 0.3,
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(vec![node.path.clone()], 8, DispatchMode::Count(3_000)),
            pending(),
        )
        .await
        .unwrap();

        assert_eq!(stats.total(), 3_000);
        assert_eq!(stats.succeeded, node.node.succeeded());
        assert_eq!(stats.failed, node.node.failed());
        assert!(stats.succeeded > 0);
        assert!(stats.failed > 0);
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn interrupt_ends_a_duration_run() {
        init();
        let node = spawn_node(MockConfig {
            latency: Duration::from_millis(5),
            ..Default::default()
        });

        let stats = run(
            &IpcConnector,
            config(
                vec![node.path.clone()],
                4,
                DispatchMode::Duration(Duration::from_secs(3600)),
            ),
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();

        assert_eq!(stats.cause, TerminationCause::Interrupted);
        assert!(stats.succeeded > 0);
        assert!(stats.elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn missing_socket_is_a_connection_error() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nothing.ipc");

        let err = run(
            &IpcConnector,
            config(vec![missing.clone()], 1, DispatchMode::Count(1)),
            pending(),
        )
        .await
        .unwrap_err();

        match err {
            RunError::Connect { endpoint, .. } => assert_eq!(endpoint, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_endpoints_never_start() {
        let err = RunConfig::new(
            vec![PathBuf::from("/tmp/a.ipc"), PathBuf::from("/tmp/b.ipc")],
            vec!["0xa".to_string()],
            "0xto",
        )
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::EndpointMismatch {
                endpoints: 2,
                senders: 1
            }
        );
    }
}
