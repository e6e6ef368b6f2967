// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use super::super::{FactsConfig, MirrorConfig, OperatorConfig};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_flags_override_defaults() {
        let config = OperatorConfig::parse_from([
            "axiom-operator",
            "--namespace",
            "inventory",
            "--dns-reader-image",
            "busybox:1.36",
            "--mongo-uri",
            "mongodb://mongo:27017",
            "--requeue-interval-secs",
            "60",
            "--metrics-bind-address",
            "127.0.0.1:9090",
        ]);

        assert_eq!(config.facts.namespace, "inventory");
        assert_eq!(config.facts.dns_reader_image, "busybox:1.36");
        assert_eq!(
            config.mirror.mongo_uri.as_deref(),
            Some("mongodb://mongo:27017")
        );
        assert_eq!(config.requeue_interval(), Duration::from_secs(60));
        assert_eq!(config.metrics_bind_address.port(), 9090);
    }

    #[test]
    fn test_probe_timeout_is_capped_at_thirty_seconds() {
        let config = FactsConfig {
            probe_timeout_secs: 120,
            ..FactsConfig::default()
        };
        assert_eq!(config.probe_timeout(), Duration::from_secs(30));

        let config = FactsConfig {
            probe_timeout_secs: 10,
            ..FactsConfig::default()
        };
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_probe_polls_every_second() {
        assert_eq!(
            FactsConfig::default().probe_poll_interval(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_mirror_defaults() {
        let config = MirrorConfig::default();
        assert!(config.mongo_uri.is_none());
        assert_eq!(config.database, "axiom");
        assert_eq!(config.collection, "clusterInfo");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
