// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `mirror.rs`

#[cfg(test)]
mod tests {
    use super::super::{
        Mirror, MirrorBackend, MirrorOutcome, MirrorSession, MockMirrorBackend,
        MockMirrorSession, MongoBackend,
    };
    use crate::config::MirrorConfig;
    use crate::crd::ClusterInfoStatus;
    use crate::errors::MirrorError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn status(cluster_id: &str) -> ClusterInfoStatus {
        ClusterInfoStatus {
            cluster_id: cluster_id.to_string(),
            kubernetes_version: "4.16.8".to_string(),
            ..Default::default()
        }
    }

    fn session(result: fn() -> Result<(), MirrorError>) -> MockMirrorSession {
        let mut session = MockMirrorSession::new();
        session
            .expect_upsert()
            .withf(|cluster_id, status| {
                cluster_id.to_string() == "0b6e0f3a" && status.cluster_id == "0b6e0f3a"
            })
            .times(1)
            .returning(move |_, _| result());
        session.expect_close().times(1).returning(|| ());
        session
    }

    #[tokio::test]
    async fn test_empty_cluster_id_never_connects() {
        let mut backend = MockMirrorBackend::new();
        backend.expect_connect().times(0);
        let mirror = Mirror::new(Arc::new(backend), Duration::from_secs(5));

        let outcome = mirror.mirror(&status("")).await.unwrap();

        assert_eq!(outcome, MirrorOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_upsert_then_close() {
        let mut backend = MockMirrorBackend::new();
        backend
            .expect_connect()
            .times(1)
            .returning(|| Ok(Box::new(session(|| Ok(()))) as Box<dyn MirrorSession>));
        let mirror = Mirror::new(Arc::new(backend), Duration::from_secs(5));

        let outcome = mirror.mirror(&status("0b6e0f3a")).await.unwrap();

        assert_eq!(outcome, MirrorOutcome::Written);
    }

    #[tokio::test]
    async fn test_session_closed_after_failed_write() {
        let mut backend = MockMirrorBackend::new();
        backend.expect_connect().times(1).returning(|| {
            Ok(Box::new(session(|| Err(MirrorError::MissingUri))) as Box<dyn MirrorSession>)
        });
        let mirror = Mirror::new(Arc::new(backend), Duration::from_secs(5));

        let err = mirror.mirror(&status("0b6e0f3a")).await.unwrap_err();

        assert!(matches!(err, MirrorError::MissingUri));
    }

    #[tokio::test]
    async fn test_connect_failure_is_returned() {
        let mut backend = MockMirrorBackend::new();
        backend
            .expect_connect()
            .times(1)
            .returning(|| Err(MirrorError::MissingUri));
        let mirror = Mirror::new(Arc::new(backend), Duration::from_secs(5));

        let err = mirror.mirror(&status("0b6e0f3a")).await.unwrap_err();

        assert!(matches!(err, MirrorError::MissingUri));
    }

    /// Backend whose connection never completes.
    struct HangingBackend;

    #[async_trait]
    impl MirrorBackend for HangingBackend {
        async fn connect(&self) -> Result<Box<dyn MirrorSession>, MirrorError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_attempt_is_bounded_by_timeout() {
        let mirror = Mirror::new(Arc::new(HangingBackend), Duration::from_millis(50));

        let err = mirror.mirror(&status("0b6e0f3a")).await.unwrap_err();

        assert!(matches!(err, MirrorError::Timeout(d) if d == Duration::from_millis(50)));
    }

    /// Backend whose sessions never finish writing and count their closes.
    struct StalledWriteBackend {
        closes: Arc<AtomicU32>,
    }

    struct StalledWriteSession {
        closes: Arc<AtomicU32>,
    }

    #[async_trait]
    impl MirrorBackend for StalledWriteBackend {
        async fn connect(&self) -> Result<Box<dyn MirrorSession>, MirrorError> {
            Ok(Box::new(StalledWriteSession {
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    #[async_trait]
    impl MirrorSession for StalledWriteSession {
        async fn upsert(
            &self,
            _cluster_id: &str,
            _status: &ClusterInfoStatus,
        ) -> Result<(), MirrorError> {
            std::future::pending().await
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_session_closed_when_write_times_out() {
        let closes = Arc::new(AtomicU32::new(0));
        let backend = StalledWriteBackend {
            closes: Arc::clone(&closes),
        };
        let mirror = Mirror::new(Arc::new(backend), Duration::from_millis(50));

        let err = mirror.mirror(&status("0b6e0f3a")).await.unwrap_err();

        assert!(matches!(err, MirrorError::Timeout(d) if d == Duration::from_millis(50)));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_runs_detached() {
        let mut backend = MockMirrorBackend::new();
        backend
            .expect_connect()
            .times(1)
            .returning(|| Ok(Box::new(session(|| Ok(()))) as Box<dyn MirrorSession>));
        let mirror = Arc::new(Mirror::new(Arc::new(backend), Duration::from_secs(5)));

        mirror.dispatch(status("0b6e0f3a")).await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let mirror = Arc::new(Mirror::new(
            Arc::new(HangingBackend),
            Duration::from_millis(10),
        ));

        // The task completes normally even though the attempt failed.
        mirror.dispatch(status("0b6e0f3a")).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_uri_fails_on_connect() {
        let backend = MongoBackend::new(&MirrorConfig::default());

        let err = backend.connect().await.err().unwrap();

        assert!(matches!(err, MirrorError::MissingUri));
    }
}
