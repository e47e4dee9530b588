use crate::commands::{or_dash, print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use threadle_config::{validate_page_cap, validate_page_size, AppConfig};
use threadle_core::{ChannelFilter, MatchTier};
use threadle_sync::{
    search_by_phones, FileConversationSource, HttpConversationSource, HttpSourceSettings,
    SearchOptions, SearchResult, StopReason,
};
use tracing::warn;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(value_name = "PHONE")]
    pub phones: Vec<String>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Replay conversations from a JSON file instead of the remote API"
    )]
    pub pages_file: Option<PathBuf>,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long, help = "Maximum number of pages to fetch")]
    pub page_cap: Option<u32>,
    #[arg(
        long = "channel",
        value_name = "CHANNEL",
        help = "Only search this channel type (repeatable)"
    )]
    pub channels: Vec<String>,
    #[arg(long, help = "Search every channel type")]
    pub any_channel: bool,
    #[arg(long, help = "Stop paging after this many seconds")]
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SearchReport {
    matches: Vec<MatchReport>,
    unresolved: Vec<String>,
    pages_fetched: u32,
    stop_reason: StopReason,
    partial: bool,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    id: Option<String>,
    target: String,
    tier: MatchTier,
    phone: String,
    best_phone: Option<String>,
    best_identifier: Option<String>,
    record: Value,
}

pub fn search(ctx: &Context<'_>, args: SearchArgs) -> Result<()> {
    let options = search_options(ctx.config, &args)?;

    let result = match args.pages_file.as_ref() {
        Some(path) => {
            let mut source = FileConversationSource::open(path)
                .with_context(|| format!("open pages file {}", path.display()))?;
            search_by_phones(&mut source, &args.phones, &options)?
        }
        None => {
            let mut source = HttpConversationSource::connect(http_settings(ctx.config))
                .with_context(|| "connect conversation source")?;
            search_by_phones(&mut source, &args.phones, &options)?
        }
    };

    if result.stop.is_partial() {
        if let StopReason::Transport(message) = &result.stop {
            warn!(error = %message, "search stopped early, results are partial");
        } else {
            warn!(reason = result.stop.label(), "search stopped early, results are partial");
        }
    }

    let report = build_report(result);
    if ctx.json {
        return print_json(&report);
    }
    print_report(&report, args.phones.len());
    Ok(())
}

fn search_options(config: &AppConfig, args: &SearchArgs) -> Result<SearchOptions> {
    if args.any_channel && !args.channels.is_empty() {
        return Err(invalid_input("--any-channel cannot be combined with --channel"));
    }
    if args.deadline_secs == Some(0) {
        return Err(invalid_input("--deadline-secs must be positive"));
    }

    let page_size = match args.page_size {
        Some(value) => validate_page_size(value)?,
        None => config.search.page_size,
    };
    let page_cap = match args.page_cap {
        Some(value) => validate_page_cap(value)?,
        None => config.search.page_cap,
    };
    let channels = if args.any_channel {
        ChannelFilter::any()
    } else if !args.channels.is_empty() {
        ChannelFilter::only(&args.channels)
    } else {
        ChannelFilter::only(&config.search.channels)
    };
    let deadline = args
        .deadline_secs
        .or(config.search.deadline_secs)
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    Ok(SearchOptions {
        page_size,
        page_cap,
        channels,
        deadline,
        cancel: None,
    })
}

fn http_settings(config: &AppConfig) -> HttpSourceSettings {
    let source = &config.source;
    HttpSourceSettings {
        base_url: source.base_url.clone(),
        account_id: source.account_id,
        api_token: source.api_token.clone(),
        user_agent: source.user_agent.clone(),
        timeout: Duration::from_secs(source.timeout_secs),
        connect_timeout: Duration::from_secs(source.connect_timeout_secs),
    }
}

fn build_report(result: SearchResult) -> SearchReport {
    let partial = result.stop.is_partial();
    let matches = result
        .matches
        .into_iter()
        .map(|found| MatchReport {
            id: found.record.id(),
            target: found.matched.target,
            tier: found.matched.tier,
            phone: found.matched.phone,
            best_phone: found.record.best_phone.clone(),
            best_identifier: found.record.best_identifier.clone(),
            record: found.record.into_value(),
        })
        .collect();
    SearchReport {
        matches,
        unresolved: result.unresolved,
        pages_fetched: result.pages_fetched,
        stop_reason: result.stop,
        partial,
    }
}

fn print_report(report: &SearchReport, requested: usize) {
    if matches!(report.stop_reason, StopReason::NoTargets) {
        println!("No usable phone numbers among {requested} input(s)");
        return;
    }

    let total = report.matches.len() + report.unresolved.len();
    println!(
        "Matched {} of {} targets ({} page(s), {})",
        report.matches.len(),
        total,
        report.pages_fetched,
        report.stop_reason.label()
    );
    for found in &report.matches {
        println!(
            "- {} -> conversation {} ({}, phone {})",
            found.target,
            or_dash(found.id.as_deref()),
            found.tier.as_str(),
            found.phone
        );
    }
    if !report.unresolved.is_empty() {
        println!("Unresolved:");
        for target in &report.unresolved {
            println!("- {}", target);
        }
    }
}
