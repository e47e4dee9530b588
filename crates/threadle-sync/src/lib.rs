pub mod error;
pub mod fixture;
pub mod http;
pub mod search;
pub mod source;

pub use error::{Result, SyncError};
pub use fixture::FileConversationSource;
pub use http::{HttpConversationSource, HttpSourceSettings};
pub use search::{
    search_by_phones, CancelToken, MatchedRecord, SearchOptions, SearchResult, StopReason,
};
pub use source::{parse_conversation_page, ConversationPage, ConversationSource};
