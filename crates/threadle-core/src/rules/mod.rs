pub mod channel;
pub mod enrich;
pub mod extract;
pub mod matching;

pub use channel::{ChannelFilter, DEFAULT_CHANNEL};
pub use enrich::{enrich, EnrichedRecord};
pub use extract::{best_of, extract, extract_candidates, BestPhone, Extraction};
pub use matching::{
    match_phone, match_record, Match, MatchTier, SUFFIX_DIGITS, SUFFIX_MIN_DIGITS,
};
