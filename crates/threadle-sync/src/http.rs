use crate::source::{ConversationPage, ConversationSource};
use crate::{Result, SyncError};
use std::time::Duration;

/// Connection settings as they come out of configuration; completeness is
/// checked when the source is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceSettings {
    pub base_url: Option<String>,
    pub account_id: Option<u64>,
    pub api_token: Option<String>,
    pub user_agent: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T> {
    value.ok_or(SyncError::MissingSetting(name))
}

#[cfg(feature = "http-source")]
mod imp {
    use super::{
        require, ConversationPage, ConversationSource, HttpSourceSettings, Result, SyncError,
    };
    use crate::source::parse_conversation_page;
    use reqwest::blocking::Client;
    use serde_json::Value;
    use tracing::debug;
    use url::Url;

    const TOKEN_HEADER: &str = "api_access_token";

    #[derive(Debug, Clone)]
    pub struct HttpConversationSource {
        client: Client,
        endpoint: Url,
        api_token: String,
    }

    impl HttpConversationSource {
        pub fn connect(settings: HttpSourceSettings) -> Result<Self> {
            let base_url = require(settings.base_url, "base_url")?;
            let account_id = require(settings.account_id, "account_id")?;
            let api_token = require(settings.api_token, "api_token")?;

            let endpoint = conversations_endpoint(&base_url, account_id)?;
            let client = Client::builder()
                .user_agent(settings.user_agent.as_deref().unwrap_or("threadle"))
                .timeout(settings.timeout)
                .connect_timeout(settings.connect_timeout)
                .build()?;
            Ok(Self {
                client,
                endpoint,
                api_token,
            })
        }
    }

    impl ConversationSource for HttpConversationSource {
        fn source_name(&self) -> &str {
            "http"
        }

        fn fetch_page(&mut self, page: u32, page_size: u32) -> Result<ConversationPage> {
            let mut url = self.endpoint.clone();
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &page_size.to_string())
                .append_pair("status", "all")
                .append_pair("assignee_type", "all");
            debug!(page, page_size, "requesting conversation page");

            let response = self
                .client
                .get(url)
                .header(TOKEN_HEADER, &self.api_token)
                .header("Accept", "application/json")
                .send()?
                .error_for_status()?;
            let body = response.text()?;
            let value: Value = serde_json::from_str(&body)
                .map_err(|err| SyncError::Parse(format!("conversation page {page}: {err}")))?;
            parse_conversation_page(value)
        }
    }

    pub(super) fn conversations_endpoint(base_url: &str, account_id: u64) -> Result<Url> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        match base.scheme() {
            "https" => {}
            "http" if is_loopback(&base) => {}
            _ => {
                return Err(SyncError::Parse(
                    "source base_url must use https".to_string(),
                ))
            }
        }
        Ok(base.join(&format!("api/v1/accounts/{account_id}/conversations"))?)
    }

    fn is_loopback(url: &Url) -> bool {
        matches!(
            url.host_str(),
            Some("localhost") | Some("127.0.0.1") | Some("[::1]")
        )
    }

}

#[cfg(not(feature = "http-source"))]
mod imp {
    use super::{
        require, ConversationPage, ConversationSource, HttpSourceSettings, Result, SyncError,
    };

    #[derive(Debug, Clone)]
    pub struct HttpConversationSource {
        _private: (),
    }

    impl HttpConversationSource {
        pub fn connect(settings: HttpSourceSettings) -> Result<Self> {
            require(settings.base_url, "base_url")?;
            require(settings.account_id, "account_id")?;
            require(settings.api_token, "api_token")?;
            Err(SyncError::Unavailable(
                "remote search requires the http-source feature".to_string(),
            ))
        }
    }

    impl ConversationSource for HttpConversationSource {
        fn source_name(&self) -> &str {
            "http"
        }

        fn fetch_page(&mut self, _page: u32, _page_size: u32) -> Result<ConversationPage> {
            Err(SyncError::Unavailable(
                "remote search requires the http-source feature".to_string(),
            ))
        }
    }
}

pub use imp::HttpConversationSource;
