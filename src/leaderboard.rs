//! Pod credits leaderboard.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error_handling::LeaderboardError;

/// Which network's credits to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    #[default]
    Mainnet,
    /// Development network
    Devnet,
}

impl Network {
    /// Maps a `?network=` query value; anything other than `mainnet` selects devnet.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") | Some("mainnet") => Network::Mainnet,
            Some(_) => Network::Devnet,
        }
    }
}

/// Credits earned by one pod.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    /// Pod public key
    pub pod_id: String,
    /// Accumulated credits
    pub credits: f64,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    pods_credits: Vec<LeaderboardEntry>,
}

/// Client for the pod credits API.
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    client: Arc<reqwest::Client>,
    mainnet_url: Url,
    devnet_url: Url,
}

impl LeaderboardClient {
    /// Creates a client for the two credits endpoints.
    pub fn new(client: Arc<reqwest::Client>, mainnet_url: Url, devnet_url: Url) -> Self {
        Self {
            client,
            mainnet_url,
            devnet_url,
        }
    }

    /// Fetches the credits for `network`, highest first.
    pub async fn fetch(&self, network: Network) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let url = match network {
            Network::Mainnet => &self.mainnet_url,
            Network::Devnet => &self.devnet_url,
        };

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::Status(status.as_u16()));
        }

        let body: CreditsResponse = response.json().await?;
        Ok(rank(body.pods_credits))
    }
}

/// Sorts by credits descending. Ties keep their upstream order.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.credits.total_cmp(&a.credits));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pod_id: &str, credits: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            pod_id: pod_id.into(),
            credits,
        }
    }

    #[test]
    fn test_rank_sorts_descending_and_is_stable() {
        let ranked = rank(vec![entry("a", 10.0), entry("b", 30.0), entry("c", 10.0)]);
        let ids: Vec<&str> = ranked.iter().map(|e| e.pod_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_list_decodes_as_empty() {
        let body: CreditsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.pods_credits.is_empty());
    }

    #[test]
    fn test_network_from_param() {
        assert_eq!(Network::from_param(None), Network::Mainnet);
        assert_eq!(Network::from_param(Some("mainnet")), Network::Mainnet);
        assert_eq!(Network::from_param(Some("devnet")), Network::Devnet);
        assert_eq!(Network::from_param(Some("testnet")), Network::Devnet);
    }
}
