//! Batched, cache-first IP geolocation.
//!
//! `GeoResolver::resolve` serves what it can from the `GeoCache`, then fetches
//! the remaining addresses from the batch provider in chunks of
//! `GEO_BATCH_SIZE`, strictly one chunk at a time with `GEO_BATCH_DELAY`
//! between consecutive requests. A failed chunk is recorded and skipped; the
//! call as a whole never fails.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use url::Url;

use super::cache::GeoCache;
use super::provider::{parse_entry, BatchQuery, EntryRejection};
use super::types::GeoPoint;
use crate::config::{GEO_BATCH_DELAY, GEO_BATCH_SIZE};
use crate::error_handling::{categorize_reqwest_error, ErrorType};

/// Why a chunk produced no points.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFailure {
    /// Counter category of the failure
    pub kind: ErrorType,
    /// Human-readable cause
    pub reason: String,
}

impl ChunkFailure {
    fn from_reqwest(error: reqwest::Error) -> Self {
        Self {
            kind: categorize_reqwest_error(&error),
            reason: error.to_string(),
        }
    }

    fn status(code: u16) -> Self {
        let kind = if code == 429 {
            ErrorType::HttpRequestTooManyRequests
        } else {
            ErrorType::HttpRequestStatusError
        };
        Self {
            kind,
            reason: format!("provider responded with status {}", code),
        }
    }
}

/// Outcome of one upstream batch request.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// The request succeeded; `resolved` of `requested` entries carried coordinates.
    Resolved {
        /// Addresses sent
        requested: usize,
        /// Addresses that came back with coordinates
        resolved: usize,
    },
    /// The request failed and none of its addresses were resolved or cached.
    Failed {
        /// Addresses sent
        requested: usize,
        /// What went wrong
        failure: ChunkFailure,
    },
}

/// Result of one `resolve` call.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved points, at most one per unique input address, in no particular order.
    pub points: Vec<GeoPoint>,
    /// Unique addresses served from the cache without an upstream call.
    pub cache_hits: usize,
    /// One entry per upstream request, in request order.
    pub outcomes: Vec<ChunkOutcome>,
}

impl Resolution {
    /// Number of upstream requests made.
    pub fn upstream_calls(&self) -> usize {
        self.outcomes.len()
    }

    /// Failures of the chunks that failed, in request order.
    pub fn failed_chunks(&self) -> impl Iterator<Item = &ChunkFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ChunkOutcome::Failed { failure, .. } => Some(failure),
            ChunkOutcome::Resolved { .. } => None,
        })
    }

    /// Number of addresses that were requested upstream but not resolved,
    /// whether the chunk failed or the provider could not place them.
    pub fn unresolved(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                ChunkOutcome::Resolved {
                    requested,
                    resolved,
                } => requested.saturating_sub(*resolved),
                ChunkOutcome::Failed { requested, .. } => *requested,
            })
            .sum()
    }
}

/// Resolves IP addresses through the cache and the batch provider.
#[derive(Debug, Clone)]
pub struct GeoResolver {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    cache: GeoCache,
}

impl GeoResolver {
    /// Creates a resolver posting to `endpoint` and memoizing into `cache`.
    pub fn new(client: Arc<reqwest::Client>, endpoint: Url, cache: GeoCache) -> Self {
        Self {
            client,
            endpoint,
            cache,
        }
    }

    /// The cache shared by every clone of this resolver.
    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    /// Resolves as many of `ips` as possible.
    ///
    /// Duplicates are collapsed. Callers are expected to have removed loopback
    /// and unspecified addresses already; this function does not special-case them.
    ///
    /// Total latency is roughly `(chunks - 1) * GEO_BATCH_DELAY` plus the
    /// round trips.
    pub async fn resolve<S: AsRef<str>>(&self, ips: &[S]) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();
        let mut missing: Vec<String> = Vec::new();

        for ip in ips {
            let ip = ip.as_ref();
            if !seen.insert(ip) {
                continue;
            }
            match self.cache.lookup(ip) {
                Some(record) => {
                    resolution.cache_hits += 1;
                    resolution.points.push(GeoPoint::new(ip, record));
                }
                None => missing.push(ip.to_string()),
            }
        }

        if missing.is_empty() {
            debug!(
                "All {} address(es) served from the geo cache",
                resolution.cache_hits
            );
            return resolution;
        }

        let chunk_count = missing.len().div_ceil(GEO_BATCH_SIZE);
        debug!(
            "Geo cache: {} hit(s), {} miss(es) across {} chunk(s)",
            resolution.cache_hits,
            missing.len(),
            chunk_count
        );

        for (index, chunk) in missing.chunks(GEO_BATCH_SIZE).enumerate() {
            let outcome = match self.fetch_chunk(chunk).await {
                Ok(points) => {
                    let resolved = points.len();
                    for point in points {
                        self.cache.store(point.ip.clone(), point.record.clone());
                        resolution.points.push(point);
                    }
                    ChunkOutcome::Resolved {
                        requested: chunk.len(),
                        resolved,
                    }
                }
                Err(failure) => {
                    warn!(
                        "Geo chunk {}/{} ({} address(es)) failed: {}",
                        index + 1,
                        chunk_count,
                        chunk.len(),
                        failure.reason
                    );
                    ChunkOutcome::Failed {
                        requested: chunk.len(),
                        failure,
                    }
                }
            };
            resolution.outcomes.push(outcome);

            if index + 1 < chunk_count {
                tokio::time::sleep(GEO_BATCH_DELAY).await;
            }
        }

        info!(
            "Resolved {} address(es): {} from cache, {} upstream call(s), {} unresolved",
            resolution.points.len(),
            resolution.cache_hits,
            resolution.upstream_calls(),
            resolution.unresolved()
        );

        resolution
    }

    async fn fetch_chunk(&self, chunk: &[String]) -> Result<Vec<GeoPoint>, ChunkFailure> {
        let body: Vec<BatchQuery<'_>> = chunk.iter().map(|ip| BatchQuery::new(ip)).collect();

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(ChunkFailure::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChunkFailure::status(status.as_u16()));
        }

        let entries: Vec<serde_json::Value> =
            response.json().await.map_err(ChunkFailure::from_reqwest)?;

        let mut points = Vec::with_capacity(entries.len());
        for entry in entries {
            match parse_entry(entry) {
                Ok(point) => points.push(point),
                Err(EntryRejection::Unresolved { query, reason }) => {
                    debug!("Provider could not resolve {}: {}", query, reason);
                }
                Err(rejection) => debug!("Skipping geo entry: {}", rejection),
            }
        }
        Ok(points)
    }
}
