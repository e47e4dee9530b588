use crate::source::ConversationSource;
use crate::{Result, SyncError};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use threadle_core::{
    enrich, match_record, ChannelFilter, EnrichedRecord, Match, TargetSet, DEFAULT_CHANNEL,
};
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_CAP: u32 = 100;

/// Shared flag that stops a running search at the next page boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub page_size: u32,
    /// Hard bound on pages fetched; reaching it is not an error.
    pub page_cap: u32,
    pub channels: ChannelFilter,
    pub deadline: Option<Instant>,
    pub cancel: Option<CancelToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_cap: DEFAULT_PAGE_CAP,
            channels: ChannelFilter::only([DEFAULT_CHANNEL]),
            deadline: None,
            cancel: None,
        }
    }
}

impl SearchOptions {
    fn interrupted(&self) -> Option<StopReason> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StopReason::DeadlineExceeded);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    NoTargets,
    AllFound,
    EmptyPage,
    ShortPage,
    PageCap,
    Transport(String),
    Cancelled,
    DeadlineExceeded,
}

impl StopReason {
    /// True when paging ended before the feed or the targets were exhausted.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            StopReason::Transport(_) | StopReason::Cancelled | StopReason::DeadlineExceeded
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopReason::NoTargets => "no usable targets",
            StopReason::AllFound => "all targets found",
            StopReason::EmptyPage => "empty page",
            StopReason::ShortPage => "last page reached",
            StopReason::PageCap => "page cap reached",
            StopReason::Transport(_) => "transport error",
            StopReason::Cancelled => "cancelled",
            StopReason::DeadlineExceeded => "deadline exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecord {
    pub record: EnrichedRecord,
    pub matched: Match,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Matches in discovery order.
    pub matches: Vec<MatchedRecord>,
    pub unresolved: Vec<String>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Scans the source page by page until every target is matched or the feed or
/// budget runs out.
///
/// A failed page fetch ends the scan but still returns everything found so
/// far; only unusable options are reported as `Err`, before any fetch.
pub fn search_by_phones<S, T>(
    source: &mut S,
    raw_targets: &[T],
    options: &SearchOptions,
) -> Result<SearchResult>
where
    S: ConversationSource + ?Sized,
    T: AsRef<str>,
{
    if options.page_size == 0 {
        return Err(SyncError::InvalidOptions("page size must be positive".to_string()));
    }
    if options.page_cap == 0 {
        return Err(SyncError::InvalidOptions("page cap must be positive".to_string()));
    }

    let mut pending = TargetSet::from_raw(raw_targets);
    if pending.is_empty() {
        debug!(inputs = raw_targets.len(), "no usable phone targets");
        return Ok(SearchResult {
            matches: Vec::new(),
            unresolved: Vec::new(),
            pages_fetched: 0,
            stop: StopReason::NoTargets,
        });
    }

    let mut matches: Vec<MatchedRecord> = Vec::new();
    let mut matched_ids: HashSet<String> = HashSet::new();
    let mut pages_fetched = 0;
    let mut stop = StopReason::PageCap;

    for page in 1..=options.page_cap {
        if let Some(reason) = options.interrupted() {
            stop = reason;
            break;
        }

        let fetched = match source.fetch_page(page, options.page_size) {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(
                    source = source.source_name(),
                    page,
                    error = %err,
                    "conversation fetch failed, keeping partial results"
                );
                stop = StopReason::Transport(err.to_string());
                break;
            }
        };
        pages_fetched += 1;

        let count = fetched.records.len();
        debug!(page, records = count, pending = pending.len(), "conversation page fetched");
        if count == 0 {
            stop = StopReason::EmptyPage;
            break;
        }

        for record in fetched.records {
            if !options.channels.accepts(&record) {
                continue;
            }
            let enriched = enrich(record);
            let id = enriched.id();
            if id.as_ref().is_some_and(|id| matched_ids.contains(id)) {
                continue;
            }
            let Some(hit) = match_record(&enriched.match_phones(), &mut pending) else {
                continue;
            };
            info!(
                record_id = id.as_deref().unwrap_or("-"),
                target = %hit.target,
                tier = hit.tier.as_str(),
                "conversation matched"
            );
            if let Some(id) = id {
                matched_ids.insert(id);
            }
            matches.push(MatchedRecord {
                record: enriched,
                matched: hit,
            });
            if pending.is_empty() {
                break;
            }
        }

        if pending.is_empty() {
            stop = StopReason::AllFound;
            break;
        }
        if count < options.page_size as usize {
            stop = StopReason::ShortPage;
            break;
        }
    }

    Ok(SearchResult {
        matches,
        unresolved: pending.into_vec(),
        pages_fetched,
        stop,
    })
}
