use crate::source::{parse_conversation_page, ConversationPage, ConversationSource};
use crate::{Result, SyncError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Replays conversations from a JSON file instead of a live API.
///
/// The file holds either recorded pages (`[[...], [...]]`, `{"pages": [...]}`,
/// or a single listing object) which are served verbatim, or a flat array of
/// records which is split into pages of the requested size.
#[derive(Debug, Clone, PartialEq)]
pub struct FileConversationSource {
    name: String,
    fixture: Fixture,
}

#[derive(Debug, Clone, PartialEq)]
enum Fixture {
    Pages(Vec<Vec<Value>>),
    Records(Vec<Value>),
}

impl FileConversationSource {
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&data)
            .map_err(|err| SyncError::Parse(format!("{}: {err}", path.display())))?;
        Ok(Self {
            name: path.display().to_string(),
            fixture: parse_fixture(value)?,
        })
    }

    pub fn from_pages(pages: Vec<Vec<Value>>) -> Self {
        Self {
            name: "pages".to_string(),
            fixture: Fixture::Pages(pages),
        }
    }

    pub fn from_records(records: Vec<Value>) -> Self {
        Self {
            name: "records".to_string(),
            fixture: Fixture::Records(records),
        }
    }

    /// Every record in the fixture, in page order.
    pub fn records(&self) -> Vec<Value> {
        match &self.fixture {
            Fixture::Pages(pages) => pages.iter().flatten().cloned().collect(),
            Fixture::Records(records) => records.clone(),
        }
    }
}

impl ConversationSource for FileConversationSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn fetch_page(&mut self, page: u32, page_size: u32) -> Result<ConversationPage> {
        if page == 0 {
            return Err(SyncError::InvalidOptions("pages are numbered from 1".to_string()));
        }
        let index = (page - 1) as usize;
        let records = match &self.fixture {
            Fixture::Pages(pages) => pages.get(index).cloned().unwrap_or_default(),
            Fixture::Records(records) => {
                let size = page_size as usize;
                let start = index.saturating_mul(size).min(records.len());
                let end = start.saturating_add(size).min(records.len());
                records[start..end].to_vec()
            }
        };
        Ok(ConversationPage { records })
    }
}

fn parse_fixture(value: Value) -> Result<Fixture> {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_array) => {
            let pages = items
                .into_iter()
                .map(|page| parse_conversation_page(page).map(|page| page.records))
                .collect::<Result<Vec<_>>>()?;
            Ok(Fixture::Pages(pages))
        }
        Value::Array(records) => Ok(Fixture::Records(records)),
        Value::Object(mut map) if map.contains_key("pages") => match map.remove("pages") {
            Some(Value::Array(pages)) => {
                let pages = pages
                    .into_iter()
                    .map(|page| parse_conversation_page(page).map(|page| page.records))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Fixture::Pages(pages))
            }
            _ => Err(SyncError::Parse("fixture pages must be an array".to_string())),
        },
        other => Ok(Fixture::Pages(vec![parse_conversation_page(other)?.records])),
    }
}
