use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use threadle_config::AppConfig;

pub mod completions;
pub mod inspect;
pub mod normalize;
pub mod search;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
