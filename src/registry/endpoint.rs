//! Endpoint address handling.

use std::collections::HashSet;
use std::net::IpAddr;

use super::types::NodeRecord;

/// Extracts the host part of a `host:port` endpoint.
///
/// Accepts bare addresses, bracketed IPv6 (`[2001:db8::1]:9001`) and
/// unbracketed IPv6 without a port. Returns `None` for an empty host.
pub fn endpoint_host(address: &str) -> Option<&str> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }
    if address.parse::<IpAddr>().is_ok() {
        return Some(address);
    }
    if let Some(rest) = address.strip_prefix('[') {
        return rest.split_once(']').map(|(host, _)| host).filter(|h| !h.is_empty());
    }
    match address.rsplit_once(':') {
        Some((host, _port)) => Some(host).filter(|h| !h.is_empty()),
        None => Some(address),
    }
}

/// Whether a host is worth placing on the map.
///
/// Loopback and unspecified addresses (`127.0.0.1`, `0.0.0.0`, `::1`, `::`)
/// never are. Hostnames are passed through; the provider resolves them.
pub fn is_mappable_host(host: &str) -> bool {
    match host.parse::<IpAddr>() {
        Ok(ip) => !ip.is_loopback() && !ip.is_unspecified(),
        Err(_) => !host.is_empty(),
    }
}

/// Unique mappable endpoint hosts of `nodes`, in first-seen order.
pub fn unique_mappable_ips(nodes: &[NodeRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter_map(NodeRecord::ip)
        .filter(|host| is_mappable_host(host))
        .filter(|host| seen.insert(*host))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_host_ipv4_with_port() {
        assert_eq!(endpoint_host("173.212.203.145:9001"), Some("173.212.203.145"));
    }

    #[test]
    fn test_endpoint_host_without_port() {
        assert_eq!(endpoint_host("173.212.203.145"), Some("173.212.203.145"));
    }

    #[test]
    fn test_endpoint_host_ipv6() {
        assert_eq!(endpoint_host("[2001:db8::1]:9001"), Some("2001:db8::1"));
        assert_eq!(endpoint_host("2001:db8::1"), Some("2001:db8::1"));
    }

    #[test]
    fn test_endpoint_host_empty() {
        assert_eq!(endpoint_host(""), None);
        assert_eq!(endpoint_host("   "), None);
        assert_eq!(endpoint_host(":9001"), None);
        assert_eq!(endpoint_host("[]:9001"), None);
    }

    #[test]
    fn test_endpoint_host_hostname() {
        assert_eq!(endpoint_host("pod.example.net:9001"), Some("pod.example.net"));
    }

    #[test]
    fn test_loopback_and_unspecified_are_not_mappable() {
        assert!(!is_mappable_host("127.0.0.1"));
        assert!(!is_mappable_host("0.0.0.0"));
        assert!(!is_mappable_host("::1"));
        assert!(!is_mappable_host("::"));
        assert!(is_mappable_host("8.8.8.8"));
        assert!(is_mappable_host("pod.example.net"));
    }

    #[test]
    fn test_unique_mappable_ips_dedups_and_filters() {
        let nodes = vec![
            NodeRecord::for_test("a", "1.1.1.1:9001"),
            NodeRecord::for_test("b", "1.1.1.1:9002"),
            NodeRecord::for_test("c", "127.0.0.1:9001"),
            NodeRecord::for_test("d", "0.0.0.0:9001"),
            NodeRecord::for_test("e", ""),
            NodeRecord::for_test("f", "2.2.2.2:9001"),
        ];
        assert_eq!(unique_mappable_ips(&nodes), vec!["1.1.1.1", "2.2.2.2"]);
    }
}
