
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_display() {
        assert_eq!(DaemonSignal::Shutdown.to_string(), "SHUTDOWN");
    }

    #[test]
    fn test_signal_handler_new() {
        let handler = SignalHandler::new();
        assert!(!handler.is_shutdown_requested());
    }

    #[test]
    fn test_request_shutdown() {
        let handler = SignalHandler::new();
        handler.request_shutdown();
        assert!(handler.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_signal_subscription() {
        let handler = SignalHandler::new();
        let mut rx = handler.subscribe();

        handler.send(DaemonSignal::Shutdown);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, DaemonSignal::Shutdown);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let handler = SignalHandler::new();
        let mut rx1 = handler.subscribe();
        let mut rx2 = handler.subscribe();

        handler.request_shutdown();

        assert_eq!(rx1.recv().await.unwrap(), DaemonSignal::Shutdown);
        assert_eq!(rx2.recv().await.unwrap(), DaemonSignal::Shutdown);
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_after_request() {
        let handler = SignalHandler::new();
        handler.request_shutdown();
        tokio::time::timeout(Duration::from_secs(1), handler.wait_for_shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_from_other_task() {
        let handler = SignalHandler::new();
        let waiter = handler.clone();
        let task = tokio::spawn(async move { waiter.wait_for_shutdown().await });

        tokio::task::yield_now().await;
        handler.request_shutdown();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_handler_clone() {
        let handler = SignalHandler::new();
        let cloned = handler.clone();

        handler.request_shutdown();
        // Cloned handler shares the same state
        assert!(cloned.is_shutdown_requested());
    }
