use crate::commands::{or_dash, print_json};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use threadle_core::normalize_phone;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[arg(required = true, value_name = "TEXT")]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NormalizedItem {
    input: String,
    normalized: Option<String>,
}

pub fn normalize(json: bool, args: NormalizeArgs) -> Result<()> {
    let items: Vec<NormalizedItem> = args
        .values
        .into_iter()
        .map(|input| NormalizedItem {
            normalized: normalize_phone(&input),
            input,
        })
        .collect();

    if json {
        return print_json(&items);
    }

    for item in items {
        println!("{}\t{}", item.input, or_dash(item.normalized.as_deref()));
    }
    Ok(())
}
