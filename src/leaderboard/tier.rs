//! Rank-to-tier resolution.

use crate::campaign::RewardTier;

/// Upper rank bound used when a tier has no configured end.
pub const DEFAULT_RANK_END: u32 = 9999;

/// Label shown for a rank that earns no tier.
pub const NO_TIER_LABEL: &str = "-";

/// Find the reward tier for a rank.
///
/// Tiers are checked in list order and the first whose inclusive range
/// contains `rank` wins. A missing or zero start means 0, a missing or zero
/// end means [`DEFAULT_RANK_END`]. Overlapping ranges therefore resolve to the
/// earliest-listed tier.
pub fn resolve_tier(rank: u32, tiers: &[RewardTier]) -> Option<&RewardTier> {
    tiers.iter().find(|tier| tier.contains_rank(rank))
}

/// Display label for a resolved tier.
///
/// A matched tier is labelled by its description (empty when it has none);
/// [`NO_TIER_LABEL`] is reserved for ranks without a tier.
pub fn tier_label(tier: Option<&RewardTier>) -> String {
    match tier {
        Some(t) => t.description.clone().unwrap_or_default(),
        None => NO_TIER_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(id: &str, start: Option<u32>, end: Option<u32>, amount: u64) -> RewardTier {
        RewardTier::new(id, amount).with_ranks(start, end)
    }

    #[test]
    fn test_resolve_exact_rank() {
        let tiers = vec![tier("gold", Some(1), Some(1), 15_000), tier("silver", Some(2), Some(5), 5_000)];

        assert_eq!(resolve_tier(1, &tiers).map(|t| t.id.as_str()), Some("gold"));
        assert_eq!(resolve_tier(4, &tiers).map(|t| t.id.as_str()), Some("silver"));
        assert!(resolve_tier(6, &tiers).is_none());
    }

    #[test]
    fn test_resolve_empty_list() {
        assert!(resolve_tier(1, &[]).is_none());
    }

    #[test]
    fn test_resolve_gap_between_ranges() {
        let tiers = vec![tier("top", Some(1), Some(2), 100), tier("late", Some(5), Some(6), 10)];
        assert!(resolve_tier(3, &tiers).is_none());
        assert!(resolve_tier(4, &tiers).is_none());
    }

    #[test]
    fn test_resolve_defaults_for_missing_bounds() {
        let open_end = vec![tier("open", Some(3), None, 50)];
        assert!(resolve_tier(2, &open_end).is_none());
        assert!(resolve_tier(9999, &open_end).is_some());
        assert!(resolve_tier(10_000, &open_end).is_none());

        let zero_end = vec![tier("zero", Some(1), Some(0), 50)];
        assert!(resolve_tier(500, &zero_end).is_some());

        let unranked = vec![tier("any", None, None, 50)];
        assert!(resolve_tier(1, &unranked).is_some());
    }

    #[test]
    fn test_overlap_first_listed_wins() {
        let tiers = vec![tier("wide", Some(1), Some(10), 100), tier("narrow", Some(1), Some(1), 999)];
        assert_eq!(resolve_tier(1, &tiers).map(|t| t.id.as_str()), Some("wide"));
    }

    #[test]
    fn test_tier_label_uses_description() {
        let described = tier("a", Some(1), Some(1), 1).with_description("Gold Prize");
        assert_eq!(tier_label(Some(&described)), "Gold Prize");
        assert_eq!(tier_label(None), NO_TIER_LABEL);
    }

    #[test]
    fn test_tier_label_matched_without_description_is_not_placeholder() {
        let conditioned = tier("b", Some(2), Some(5), 1).with_condition("Rank 2-5");
        assert_eq!(tier_label(Some(&conditioned)), "");

        let bare = tier("c", None, None, 1);
        assert_eq!(tier_label(Some(&bare)), "");
        assert_ne!(tier_label(Some(&bare)), tier_label(None));
    }
}
