//! Collection walker - main traversal logic
//!
//! This module drives the whole pull:
//! - Paginating the collection listing via the server's `next` locator
//! - Looking up marketplace stats for each release
//! - Accumulating priced records in insertion order
//! - Autosaving the table at a bounded interval of items seen
//! - Pacing between outbound calls so rate limits are rarely hit at all

use crate::client::{ApiClient, RetryPolicy};
use crate::config::Config;
use crate::output::{EnrichedRecord, ReportSink};
use crate::price::{extract_lowest_price, extract_num_for_sale};
use crate::pull::page::{CollectionItem, CollectionPage};
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;
use tokio::time::sleep;

/// Summary of one completed traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutcome {
    /// Releases encountered across all pages, stored or not
    pub seen: u64,

    /// Records that made it into the final table
    pub stored: usize,

    /// Collection pages successfully fetched
    pub pages: u32,

    /// True when a page fetch failed and traversal stopped early
    pub aborted: bool,
}

/// Collection walker
///
/// Owns the accumulated result set for the duration of a run; the sink only
/// ever borrows it. Strictly sequential: one outstanding network call at a
/// time, with a pacing sleep between calls.
pub struct Walker {
    client: ApiClient,
    base_url: String,
    username: String,
    page_size: u32,
    pacing: Duration,
    autosave_interval: u64,
}

impl Walker {
    /// Creates a walker from the configuration with the default retry policy
    pub fn new(config: &Config) -> crate::Result<Self> {
        Self::with_policy(config, RetryPolicy::default())
    }

    /// Creates a walker with an explicit retry policy
    ///
    /// Tests use this to shrink backoff waits to milliseconds.
    pub fn with_policy(config: &Config, policy: RetryPolicy) -> crate::Result<Self> {
        let client = ApiClient::new(&config.api.token, &config.api.user_agent, policy)?;
        Ok(Walker {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            username: config.api.username.clone(),
            page_size: config.pull.page_size,
            pacing: Duration::from_secs_f64(config.pull.pacing_delay),
            autosave_interval: u64::from(config.pull.autosave_interval),
        })
    }

    /// URL of the first collection page; later pages come from the server
    fn first_page_url(&self) -> String {
        format!(
            "{}/users/{}/collection/folders/0/releases?per_page={}&page=1",
            self.base_url, self.username, self.page_size
        )
    }

    fn stats_url(&self, release_id: u64) -> String {
        format!("{}/marketplace/stats/{}", self.base_url, release_id)
    }

    /// Politeness delay between outbound calls, independent of retry backoff
    async fn pace(&self) {
        if !self.pacing.is_zero() {
            sleep(self.pacing).await;
        }
    }

    /// Runs the full traversal and returns a summary
    ///
    /// Walks page by page, pricing each release and appending the priced
    /// ones to the result set. Every `autosave_interval` releases seen, the
    /// sink rewrites the table with everything gathered so far, which caps
    /// data loss if the process dies. A page that cannot be fetched stops
    /// the traversal early rather than failing the run.
    ///
    /// One final persist always happens, even for an empty result set; its
    /// failure is the only sink error that fails the run.
    pub async fn run(&self, sink: &dyn ReportSink) -> crate::Result<PullOutcome> {
        let mut records: Vec<EnrichedRecord> = Vec::new();
        let mut seen: u64 = 0;
        let mut pages: u32 = 0;
        let mut aborted = false;
        let mut url = self.first_page_url();

        loop {
            let Some(payload) = self.client.get_json(&url).await else {
                tracing::error!("failed to fetch collection page, stopping early: {}", url);
                aborted = true;
                break;
            };

            let page: CollectionPage = match serde_json::from_value(payload) {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!("collection page has unexpected shape ({}): {}", url, e);
                    aborted = true;
                    break;
                }
            };
            pages += 1;

            for entry in &page.releases {
                seen += 1;

                match entry.basic_information.to_item() {
                    None => {
                        tracing::warn!("[{}] release without id, skipping", seen);
                    }
                    Some(item) => {
                        self.pace().await;
                        if let Some(record) = self.price_item(&item).await {
                            tracing::info!(
                                "[{}] {} | {} - {} => {}",
                                seen,
                                record.release_id,
                                record.artist,
                                record.title,
                                record.lowest_price
                            );
                            records.push(record);
                        }
                    }
                }

                // Interval counts items seen, not stored: a stretch of
                // unpriced releases still refreshes the table on disk
                if seen % self.autosave_interval == 0 {
                    if let Err(e) = sink.persist(&records) {
                        tracing::error!(
                            "autosave failed, keeping {} rows in memory: {}",
                            records.len(),
                            e
                        );
                    }
                }
            }

            match page.next_url() {
                Some(next) => {
                    // The locator is complete as sent; never reassembled
                    url = next.to_string();
                    self.pace().await;
                }
                None => break,
            }
        }

        sink.persist(&records)?;
        tracing::info!(
            "pull finished: {} rows from {} releases seen across {} pages{}",
            records.len(),
            seen,
            pages,
            if aborted { " (stopped early)" } else { "" }
        );

        Ok(PullOutcome {
            seen,
            stored: records.len(),
            pages,
            aborted,
        })
    }

    /// Fetches marketplace stats for one release and joins them into a record
    ///
    /// Returns `None` when the stats call fails or no lowest price resolves;
    /// such releases are dropped rather than stored with placeholders.
    async fn price_item(&self, item: &CollectionItem) -> Option<EnrichedRecord> {
        let stats = self.client.get_json(&self.stats_url(item.release_id)).await;

        let lowest = match extract_lowest_price(stats.as_ref()) {
            Some(price) => price,
            None => {
                tracing::debug!("no lowest price for release {}, dropped", item.release_id);
                return None;
            }
        };

        Some(EnrichedRecord {
            release_id: item.release_id,
            artist: item.artist_names.clone(),
            title: item.title.clone(),
            lowest_price: round_price(lowest),
            num_for_sale: extract_num_for_sale(stats.as_ref()),
        })
    }
}

/// Rounds an exact price to 2 decimal places for storage
///
/// Midpoint away from zero on the exact decimal, so 12.345 becomes 12.35.
/// The result keeps a scale of exactly 2 so table cells read as money.
fn round_price(price: Decimal) -> Decimal {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
