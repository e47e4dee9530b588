use crate::domain::target::TargetSet;
use serde::Serialize;

/// Both sides need at least this many digits before suffixes are compared.
pub const SUFFIX_MIN_DIGITS: usize = 8;
/// Longest trailing run compared by the suffix tier.
pub const SUFFIX_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Suffix,
    Substring,
}

impl MatchTier {
    /// Tiers in decreasing order of confidence.
    pub const ALL: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Suffix, MatchTier::Substring];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Suffix => "suffix",
            MatchTier::Substring => "substring",
        }
    }

    fn hits(self, phone: &str, target: &str) -> bool {
        if phone.is_empty() || target.is_empty() {
            return false;
        }
        match self {
            MatchTier::Exact => phone == target,
            MatchTier::Suffix => {
                phone.len() >= SUFFIX_MIN_DIGITS
                    && target.len() >= SUFFIX_MIN_DIGITS
                    && trailing_digits(phone) == trailing_digits(target)
            }
            // Known to over-match numbers sharing a long digit run (area codes).
            MatchTier::Substring => phone.contains(target) || target.contains(phone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub target: String,
    pub phone: String,
    pub tier: MatchTier,
}

/// Matches one normalized phone against the pending targets.
///
/// On a hit the target is removed from `pending`.
pub fn match_phone(phone: &str, pending: &mut TargetSet) -> Option<Match> {
    match_record(&[phone], pending)
}

/// Matches a record's phones (best first) against the pending targets.
///
/// Tiers form the outer loop, so an exact hit on any phone beats a suffix hit
/// on the best one. At most one target is consumed.
pub fn match_record<S: AsRef<str>>(phones: &[S], pending: &mut TargetSet) -> Option<Match> {
    for tier in MatchTier::ALL {
        for phone in phones {
            let phone = phone.as_ref();
            let hit = pending
                .iter()
                .find(|target| tier.hits(phone, target))
                .map(str::to_string);
            if let Some(target) = hit {
                pending.take(&target);
                return Some(Match {
                    target,
                    phone: phone.to_string(),
                    tier,
                });
            }
        }
    }
    None
}

fn trailing_digits(value: &str) -> &str {
    value
        .get(value.len().saturating_sub(SUFFIX_DIGITS)..)
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{match_phone, match_record, MatchTier};
    use crate::domain::target::TargetSet;

    #[test]
    fn exact_match_consumes_target() {
        let mut pending = TargetSet::from_raw(["5491165442102", "5491199990000"]);
        let hit = match_phone("5491165442102", &mut pending).expect("match");
        assert_eq!(hit.tier, MatchTier::Exact);
        assert_eq!(hit.target, "5491165442102");
        assert_eq!(pending.iter().collect::<Vec<_>>(), vec!["5491199990000"]);
    }

    #[test]
    fn suffix_match_compares_last_ten_digits() {
        let mut pending = TargetSet::from_raw(["91112345678"]);
        let hit = match_phone("5491112345678", &mut pending).expect("match");
        assert_eq!(hit.tier, MatchTier::Suffix);
        assert!(pending.is_empty());
    }

    #[test]
    fn suffix_requires_eight_digits_on_both_sides() {
        let mut pending = TargetSet::from_raw(["87654321"]);
        assert!(match_phone("12345678", &mut pending).is_none());
        assert_eq!(pending.len(), 1);

        let mut pending = TargetSet::from_raw(["2345678"]);
        let hit = match_phone("912345678", &mut pending).expect("match");
        assert_eq!(hit.tier, MatchTier::Substring);
    }

    #[test]
    fn substring_match_is_symmetric() {
        let mut pending = TargetSet::from_raw(["1165442"]);
        let hit = match_phone("5491165442102", &mut pending).expect("target inside phone");
        assert_eq!(hit.tier, MatchTier::Substring);

        let mut pending = TargetSet::from_raw(["005491165442102999"]);
        let hit = match_phone("5491165442102", &mut pending).expect("phone inside target");
        assert_eq!(hit.tier, MatchTier::Substring);
    }

    #[test]
    fn exact_across_targets_beats_earlier_weaker_tiers() {
        let mut pending = TargetSet::from_raw(["65442102", "5491165442102"]);
        let hit = match_phone("5491165442102", &mut pending).expect("match");
        assert_eq!(hit.tier, MatchTier::Exact);
        assert_eq!(hit.target, "5491165442102");
        assert_eq!(pending.iter().collect::<Vec<_>>(), vec!["65442102"]);
    }

    #[test]
    fn record_phones_are_tried_tier_by_tier() {
        let mut pending = TargetSet::from_raw(["5491199990000"]);
        let phones = ["15491199990000", "5491199990000"];
        let hit = match_record(&phones[..], &mut pending).expect("match");
        assert_eq!(hit.tier, MatchTier::Exact);
        assert_eq!(hit.phone, "5491199990000");
    }

    #[test]
    fn matched_target_is_not_matched_again() {
        let mut pending = TargetSet::from_raw(["5491165442102"]);
        assert!(match_phone("5491165442102", &mut pending).is_some());
        assert!(match_phone("5491165442102", &mut pending).is_none());
    }

    #[test]
    fn empty_phone_never_matches() {
        let mut pending = TargetSet::from_raw(["5491165442102"]);
        assert!(match_phone("", &mut pending).is_none());
    }
}
