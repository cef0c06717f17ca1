//! Grouping of resolved points into map points.

use std::collections::HashMap;

use serde::Serialize;

use super::types::GeoPoint;
use crate::registry::NodeRecord;

/// One renderable coordinate, aggregating every node whose endpoint resolved
/// to exactly this `(lat, lon)`.
///
/// Nodes are referenced by public key; the records themselves live in the
/// snapshot's node list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// First address that produced this coordinate
    pub label: String,
    /// Country of the first address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City of the first address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Public keys of the nodes at this coordinate, in node order
    pub node_pubkeys: Vec<String>,
}

/// Builds one `MapPoint` per distinct `"lat,lon"` key.
///
/// Every node whose endpoint host equals a point's address attaches to that
/// point's coordinate, so several pods behind one host, or several hosts the
/// provider places at the same spot, collapse into one map point. Keys are
/// compared exactly; there is no clustering. Output follows first-seen key order.
pub fn group_nodes_by_coordinate(nodes: &[NodeRecord], points: &[GeoPoint]) -> Vec<MapPoint> {
    let mut nodes_by_ip: HashMap<&str, Vec<&NodeRecord>> = HashMap::new();
    for node in nodes {
        if let Some(ip) = node.ip() {
            nodes_by_ip.entry(ip).or_default().push(node);
        }
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut map_points: Vec<MapPoint> = Vec::new();

    for point in points {
        let key = point.coordinate_key();
        let position = *index.entry(key).or_insert_with(|| {
            map_points.push(MapPoint {
                lat: point.record.lat,
                lon: point.record.lon,
                label: point.ip.clone(),
                country: point.record.country.clone(),
                city: point.record.city.clone(),
                node_pubkeys: Vec::new(),
            });
            map_points.len() - 1
        });

        let map_point = &mut map_points[position];
        for node in nodes_by_ip.get(point.ip.as_str()).into_iter().flatten() {
            if !map_point.node_pubkeys.contains(&node.pubkey) {
                map_point.node_pubkeys.push(node.pubkey.clone());
            }
        }
    }

    map_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoRecord;

    fn point(ip: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(
            ip,
            GeoRecord {
                lat,
                lon,
                country: Some("Germany".into()),
                city: None,
            },
        )
    }

    #[test]
    fn test_distinct_ips_at_same_coordinate_share_a_point() {
        let nodes = vec![
            NodeRecord::for_test("pk-a", "5.9.0.1:9001"),
            NodeRecord::for_test("pk-b", "5.9.0.2:9001"),
        ];
        let points = vec![point("5.9.0.1", 50.1109, 8.6821), point("5.9.0.2", 50.1109, 8.6821)];

        let grouped = group_nodes_by_coordinate(&nodes, &points);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].label, "5.9.0.1");
        assert_eq!(grouped[0].node_pubkeys, vec!["pk-a", "pk-b"]);
    }

    #[test]
    fn test_pods_behind_one_host_all_attach() {
        let nodes = vec![
            NodeRecord::for_test("pk-a", "5.9.0.1:9001"),
            NodeRecord::for_test("pk-b", "5.9.0.1:9002"),
            NodeRecord::for_test("pk-c", "5.9.0.1:9003"),
        ];
        let grouped = group_nodes_by_coordinate(&nodes, &[point("5.9.0.1", 50.1, 8.6)]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].node_pubkeys.len(), 3);
    }

    #[test]
    fn test_nearby_but_unequal_coordinates_stay_separate() {
        let nodes = vec![
            NodeRecord::for_test("pk-a", "5.9.0.1:9001"),
            NodeRecord::for_test("pk-b", "5.9.0.2:9001"),
        ];
        let points = vec![point("5.9.0.1", 50.1109, 8.6821), point("5.9.0.2", 50.1109, 8.68211)];
        let grouped = group_nodes_by_coordinate(&nodes, &points);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_host_matching_is_exact_not_prefix() {
        let nodes = vec![
            NodeRecord::for_test("pk-a", "1.2.3.4:9001"),
            NodeRecord::for_test("pk-b", "1.2.3.45:9001"),
        ];
        let grouped = group_nodes_by_coordinate(&nodes, &[point("1.2.3.4", 10.0, 20.0)]);
        assert_eq!(grouped[0].node_pubkeys, vec!["pk-a"]);
    }

    #[test]
    fn test_point_without_nodes_is_kept() {
        let grouped = group_nodes_by_coordinate(&[], &[point("9.9.9.9", 47.0, 8.0)]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].node_pubkeys.is_empty());
    }
}
