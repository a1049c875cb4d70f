//! Pagination discovery
//!
//! One run proceeds in three stages, each only when the previous one left
//! evidence of missing data:
//!
//! 1. The unparameterized request.
//! 2. A battery of "give me everything" requests (`limit=N`, `paginate=false`, ...).
//! 3. Incremental paging, trying each known convention per page.
//!
//! Every network call counts against `max_requests`, so a backend that keeps
//! returning fresh data cannot make a run loop forever.

use actasti_domain::constants::COMMON_PAGE_SIZES;
use actasti_domain::{InventoryEnvelope, InventoryItem, PaginationConfig, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::conventions::{LargeLimitProbe, PageConvention};
use super::merge::MergedInventory;
use super::ports::{PageSource, QueryParam};
use crate::normalize::normalize_envelope;

/// Why a discovery run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The first response already covered the declared total
    Complete,
    /// The first response showed no sign of truncation
    NoMoreData,
    /// A large-limit probe returned the full set
    ProbeAdopted,
    /// The merged set reached the declared total
    TotalReached,
    /// A page came back shorter than the page size
    ShortPage,
    /// No convention produced any new item
    Converged,
    /// The request budget ran out
    RequestBudget,
    /// An authentication or server failure ended the run early
    Aborted,
}

/// Result of a discovery run
#[derive(Debug, Clone)]
pub struct Discovery {
    pub items: Vec<InventoryItem>,
    /// Network calls issued, initial request included
    pub requests: usize,
    pub stop: StopReason,
    /// Convention that produced the last accepted page, if any
    pub convention: Option<PageConvention>,
}

/// Outcome of the large-limit battery
enum ProbeOutcome {
    Adopted,
    Inconclusive,
    Aborted,
}

/// Outcome of fetching one page through the convention chain
enum PageOutcome {
    Accepted { convention: PageConvention, returned: usize },
    Converged,
    Budget,
    Aborted,
}

struct Run<'s, S: ?Sized> {
    source: &'s S,
    requests: usize,
    budget: usize,
}

impl<S: PageSource + ?Sized> Run<'_, S> {
    fn exhausted(&self) -> bool {
        self.requests >= self.budget
    }

    async fn fetch(&mut self, params: &[QueryParam]) -> Result<Value> {
        self.requests += 1;
        self.source.fetch_page(params).await
    }
}

/// Discovers and drains the inventory endpoint's pagination
///
/// The convention that last produced a page is remembered and tried first on
/// the next run.
#[derive(Debug, Default)]
pub struct PaginationDiscoverer {
    config: PaginationConfig,
    preferred: parking_lot::Mutex<Option<PageConvention>>,
}

impl PaginationDiscoverer {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config, preferred: parking_lot::Mutex::new(None) }
    }

    pub fn config(&self) -> PaginationConfig {
        self.config
    }

    pub fn preferred_convention(&self) -> Option<PageConvention> {
        *self.preferred.lock()
    }

    /// Fetch the complete inventory.
    ///
    /// # Errors
    ///
    /// Only a failure of the initial request (transport or shape) is
    /// returned; later failures end the run with the data gathered so far.
    pub async fn fetch_all<S: PageSource + ?Sized>(&self, source: &S) -> Result<Vec<InventoryItem>> {
        self.discover(source).await.map(|discovery| discovery.items)
    }

    /// Like [`fetch_all`](Self::fetch_all), but report how the run went.
    ///
    /// # Errors
    ///
    /// Propagates failures of the initial request.
    pub async fn discover<S: PageSource + ?Sized>(&self, source: &S) -> Result<Discovery> {
        let mut run = Run { source, requests: 0, budget: self.config.max_requests.max(1) };

        let payload = run.fetch(&[]).await?;
        let initial = normalize_envelope(&payload)?;
        let mut merged = MergedInventory::from_items(initial.items.iter().cloned());
        debug!(
            items = initial.items.len(),
            total = ?initial.total,
            limit = ?initial.limit,
            "Initial inventory response"
        );

        if initial.is_complete() {
            return Ok(finish(merged, run.requests, StopReason::Complete, None));
        }
        if !suggests_more(&initial) {
            return Ok(finish(merged, run.requests, StopReason::NoMoreData, None));
        }

        let stop = match self.probe_large_limit(&mut run, &mut merged, &initial).await {
            ProbeOutcome::Adopted => Some(StopReason::ProbeAdopted),
            ProbeOutcome::Aborted => Some(StopReason::Aborted),
            ProbeOutcome::Inconclusive => None,
        };
        if let Some(stop) = stop {
            return Ok(finish(merged, run.requests, stop, None));
        }
        if reached(&merged, initial.total) {
            return Ok(finish(merged, run.requests, StopReason::TotalReached, None));
        }

        let page_size = initial.limit.unwrap_or(initial.items.len()).max(1);
        let (stop, convention) =
            self.paginate(&mut run, &mut merged, page_size, initial.total).await;
        Ok(finish(merged, run.requests, stop, convention))
    }

    async fn probe_large_limit<S: PageSource + ?Sized>(
        &self,
        run: &mut Run<'_, S>,
        merged: &mut MergedInventory,
        initial: &InventoryEnvelope,
    ) -> ProbeOutcome {
        let size = initial.total.unwrap_or(self.config.large_limit).max(initial.items.len() + 1);
        let mut best: Option<MergedInventory> = None;

        for probe in LargeLimitProbe::BATTERY {
            if run.exhausted() {
                break;
            }
            let envelope = match run.fetch(&probe.params(size)).await {
                Ok(payload) => match normalize_envelope(&payload) {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        debug!(probe = ?probe, error = %err, "Large-limit probe returned no inventory");
                        continue;
                    }
                },
                Err(err) if err.aborts_probe_chain() => {
                    warn!(probe = ?probe, error = %err, "Large-limit probe aborted discovery");
                    adopt_best(merged, best);
                    return ProbeOutcome::Aborted;
                }
                Err(err) => {
                    debug!(probe = ?probe, error = %err, "Large-limit probe failed");
                    continue;
                }
            };

            let returned = envelope.items.len();
            let total = initial.total.or(envelope.total);
            let mut candidate = merged.clone();
            let added = candidate.merge(envelope.items.iter().cloned());

            // Without a total, a response cut at its own echoed limit is a
            // server cap, not the end of the data.
            let complete = match total {
                Some(total) => candidate.len() >= total,
                None => {
                    added > 0
                        && !looks_truncated(&envelope)
                        && probe.requested(size).map_or(true, |requested| returned < requested)
                }
            };
            debug!(probe = ?probe, returned, added, complete, "Large-limit probe response");

            if complete {
                *merged = candidate;
                return ProbeOutcome::Adopted;
            }
            if best.as_ref().map_or(true, |b| candidate.len() > b.len()) {
                best = Some(candidate);
            }
        }

        adopt_best(merged, best);
        ProbeOutcome::Inconclusive
    }

    async fn paginate<S: PageSource + ?Sized>(
        &self,
        run: &mut Run<'_, S>,
        merged: &mut MergedInventory,
        page_size: usize,
        total: Option<usize>,
    ) -> (StopReason, Option<PageConvention>) {
        let mut index = (merged.len() / page_size).max(1);
        let mut last = None;

        loop {
            let preferred = self.preferred_convention();
            match self.fetch_next_page(run, merged, preferred, index, page_size).await {
                PageOutcome::Accepted { convention, returned } => {
                    *self.preferred.lock() = Some(convention);
                    last = Some(convention);
                    if reached(merged, total) {
                        return (StopReason::TotalReached, last);
                    }
                    if returned < page_size {
                        return (StopReason::ShortPage, last);
                    }
                    index += 1;
                }
                PageOutcome::Converged => return (StopReason::Converged, last),
                PageOutcome::Budget => return (StopReason::RequestBudget, last),
                PageOutcome::Aborted => return (StopReason::Aborted, last),
            }
        }
    }

    async fn fetch_next_page<S: PageSource + ?Sized>(
        &self,
        run: &mut Run<'_, S>,
        merged: &mut MergedInventory,
        preferred: Option<PageConvention>,
        index: usize,
        page_size: usize,
    ) -> PageOutcome {
        for convention in PageConvention::order(preferred) {
            if run.exhausted() {
                warn!(requests = run.requests, "Inventory discovery hit its request budget");
                return PageOutcome::Budget;
            }
            let payload = match run.fetch(&convention.params(index, page_size)).await {
                Ok(payload) => payload,
                Err(err) if err.aborts_probe_chain() => {
                    warn!(convention = convention.as_str(), error = %err, "Paging aborted discovery");
                    return PageOutcome::Aborted;
                }
                Err(err) => {
                    debug!(convention = convention.as_str(), error = %err, "Paging convention failed");
                    continue;
                }
            };
            let Ok(envelope) = normalize_envelope(&payload) else {
                continue;
            };

            let returned = envelope.items.len();
            let added = merged.merge(envelope.items);
            debug!(convention = convention.as_str(), page = index + 1, returned, added, "Page response");
            if added > 0 {
                return PageOutcome::Accepted { convention, returned };
            }
        }
        PageOutcome::Converged
    }
}

fn finish(
    merged: MergedInventory,
    requests: usize,
    stop: StopReason,
    convention: Option<PageConvention>,
) -> Discovery {
    let discovery = Discovery { items: merged.into_items(), requests, stop, convention };
    info!(
        items = discovery.items.len(),
        requests = discovery.requests,
        stop = ?discovery.stop,
        "Inventory discovery finished"
    );
    discovery
}

fn adopt_best(merged: &mut MergedInventory, best: Option<MergedInventory>) {
    if let Some(best) = best.filter(|best| best.len() > merged.len()) {
        debug!(items = best.len(), "Keeping partial large-limit result");
        *merged = best;
    }
}

fn reached(merged: &MergedInventory, total: Option<usize>) -> bool {
    total.is_some_and(|total| merged.len() >= total)
}

/// Whether the first response hints at more data than it carried.
fn suggests_more(envelope: &InventoryEnvelope) -> bool {
    match envelope.total {
        Some(total) => envelope.items.len() < total,
        None => looks_truncated(envelope),
    }
}

/// Whether a response looks cut at a page boundary.
fn looks_truncated(envelope: &InventoryEnvelope) -> bool {
    let len = envelope.items.len();
    len > 0
        && match envelope.limit {
            Some(limit) => len >= limit,
            None => COMMON_PAGE_SIZES.contains(&len),
        }
}
