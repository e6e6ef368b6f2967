// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `quantity.rs`

#[cfg(test)]
mod tests {
    use super::super::Quantity;

    fn q(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(q("4").value(), 4);
        assert_eq!(q("110").value(), 110);
        assert_eq!(q("0").value(), 0);
    }

    #[test]
    fn test_parse_millicores() {
        assert_eq!(q("500m").millis(), 500);
        assert_eq!(q("1.5").millis(), 1500);
        assert_eq!(q("0.25").millis(), 250);
    }

    #[test]
    fn test_parse_binary_suffixes() {
        assert_eq!(q("1Ki").value(), 1024);
        assert_eq!(q("4Gi").value(), 4 * 1024 * 1024 * 1024);
        assert_eq!(q("1.5Gi").value(), 1536 * 1024 * 1024);
    }

    #[test]
    fn test_parse_decimal_suffixes_and_exponents() {
        assert_eq!(q("1k").value(), 1000);
        assert_eq!(q("2M").value(), 2_000_000);
        assert_eq!(q("1e3").value(), 1000);
        assert_eq!(q("5E-3").millis(), 5);
    }

    #[test]
    fn test_parse_kibibyte_memory_as_reported_by_kubelet() {
        // Kubelets commonly report memory in Ki
        assert_eq!(q("16262568Ki").to_mib_string(), "15881Mi");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Quantity::parse("").is_err());
        assert!(Quantity::parse("abc").is_err());
        assert!(Quantity::parse("4Xi").is_err());
        assert!(Quantity::parse("1.2.3").is_err());
    }

    #[test]
    fn test_cpu_rendering() {
        let total: Quantity = ["2", "4"].iter().map(|s| q(s)).sum();
        assert_eq!(total.to_cpu_string(), "6");

        let total: Quantity = ["2", "500m"].iter().map(|s| q(s)).sum();
        assert_eq!(total.to_cpu_string(), "2500m");
    }

    #[test]
    fn test_memory_rendering_in_mib() {
        let total: Quantity = ["4Gi", "8Gi"].iter().map(|s| q(s)).sum();
        assert_eq!(total.to_mib_string(), "12288Mi");
        assert_eq!(Quantity::ZERO.to_mib_string(), "0Mi");
    }

    #[test]
    fn test_count_rendering() {
        let total: Quantity = ["250", "250", "250"].iter().map(|s| q(s)).sum();
        assert_eq!(total.to_count_string(), "750");
        assert_eq!(Quantity::ZERO.to_count_string(), "0");
    }

    #[test]
    fn test_large_totals_render_without_suffix() {
        let pods: Quantity = ["250", "250", "250", "250"].iter().map(|s| q(s)).sum();
        assert_eq!(pods.to_count_string(), "1000");
        assert_eq!(q("1k").to_count_string(), "1000");
        assert_eq!(q("1024").to_cpu_string(), "1024");
        assert_eq!(q("1Ki").to_cpu_string(), "1024");
    }
}
