mod utils;
#[allow(unused)]
use utils::*;

mod tests {
    use super::*;

    use ethbench::prelude::*;
    use mock_service::MockConfig;
    use std::future::pending;
    use std::time::Duration;

    fn two_nodes(latency: Duration) -> (TestNode, TestNode) {
        let config = MockConfig {
            latency,
            ..Default::default()
        };
        (spawn_node(config.clone()), spawn_node(config))
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn count_mode_drains_every_endpoint() {
        init();
        let (a, b) = two_nodes(Duration::from_millis(1));

        let config = RunConfig::new(
            vec![a.path.clone(), b.path.clone()],
            vec!["0xa".to_string(), "0xb".to_string()],
            "0xto",
        )
        .unwrap()
        .concurrency(3)
        .mode(DispatchMode::Count(50));

        let stats = run(&IpcConnector, config, pending()).await.unwrap();

        assert_eq!(stats.cause, TerminationCause::WorkExhausted);
        assert_eq!(stats.endpoints, 2);
        assert_eq!(stats.succeeded, 100);
        assert_eq!(a.node.succeeded(), 50);
        assert_eq!(b.node.succeeded(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ntest::timeout(10_000)]
    async fn duration_mode_loads_every_endpoint() {
        init();
        let (a, b) = two_nodes(Duration::from_millis(10));

        let config = RunConfig::new(
            vec![a.path.clone(), b.path.clone()],
            vec!["0xa".to_string(), "0xb".to_string()],
            "0xto",
        )
        .unwrap()
        .concurrency(2)
        .mode(DispatchMode::Duration(Duration::from_secs(1)));

        let stats = run(&IpcConnector, config, pending()).await.unwrap();

        assert_eq!(stats.cause, TerminationCause::DurationElapsed);
        assert!(stats.elapsed >= Duration::from_secs(1));
        assert!(stats.elapsed < Duration::from_secs(3));
        assert!(a.node.succeeded() > 0);
        assert!(b.node.succeeded() > 0);
        // Calls still in flight at the deadline are answered but not in the report.
        assert!(stats.succeeded <= a.node.succeeded() + b.node.succeeded());
        assert_eq!(stats.failed, 0);

        let json: serde_json::Value = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["cause"], "duration_elapsed");
        assert_eq!(json["endpoints"], 2);
    }
}
