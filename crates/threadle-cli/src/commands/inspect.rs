use crate::commands::{or_dash, print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use threadle_core::{enrich, record_channel, ChannelFilter};
use threadle_sync::FileConversationSource;

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(long, value_name = "FILE", help = "JSON file of recorded conversation pages")]
    pub pages_file: PathBuf,
    #[arg(long, help = "Accept every channel instead of the configured ones")]
    pub any_channel: bool,
}

#[derive(Debug, Serialize)]
struct InspectItem {
    id: Option<String>,
    channel: Option<String>,
    channel_accepted: bool,
    best_phone: Option<String>,
    best_identifier: Option<String>,
    best_phone_raw: Option<String>,
    phone_candidates: Vec<String>,
}

pub fn inspect(ctx: &Context<'_>, args: InspectArgs) -> Result<()> {
    let source = FileConversationSource::open(&args.pages_file)
        .with_context(|| format!("open pages file {}", args.pages_file.display()))?;
    let filter = if args.any_channel {
        ChannelFilter::any()
    } else {
        ChannelFilter::only(&ctx.config.search.channels)
    };

    let items: Vec<InspectItem> = source
        .records()
        .into_iter()
        .map(|record| {
            let channel = record_channel(&record).map(str::to_string);
            let channel_accepted = filter.accepts(&record);
            let enriched = enrich(record);
            InspectItem {
                id: enriched.id(),
                channel,
                channel_accepted,
                best_phone: enriched.best_phone,
                best_identifier: enriched.best_identifier,
                best_phone_raw: enriched.best_phone_raw,
                phone_candidates: enriched.phone_candidates,
            }
        })
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("No conversations in {}", args.pages_file.display());
        return Ok(());
    }
    for item in items {
        let skipped = if item.channel_accepted { "" } else { " (channel skipped)" };
        println!(
            "{}\t{}\t{}\t{}{}",
            or_dash(item.id.as_deref()),
            or_dash(item.best_phone.as_deref()),
            or_dash(item.best_identifier.as_deref()),
            item.phone_candidates.join(","),
            skipped
        );
    }
    Ok(())
}
