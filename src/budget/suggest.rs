//! Budget allocation suggestions.
//!
//! A [`BudgetAdvisor`] proposes reward tiers for a budget. Advisors may be
//! remote and unreliable, so callers go through [`suggest_allocation`], which
//! merges the proposal with the tiers already configured and falls back to a
//! fixed split when the advisor fails.
//!
//! [`RuleBasedAdvisor`] is an offline advisor that follows the same
//! allocation rules a remote one is asked for.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::campaign::{Campaign, CampaignType, RewardTier};

/// Errors from a budget advisor.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Advisor unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid advisor response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What an advisor is asked to allocate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub total_budget: u64,
    pub campaign_types: Vec<CampaignType>,
    #[serde(default)]
    pub description: String,
    /// Tiers to fill in; empty asks for a fresh structure
    #[serde(default)]
    pub existing_tiers: Vec<RewardTier>,
}

impl SuggestionRequest {
    pub fn new(total_budget: u64, campaign_types: Vec<CampaignType>) -> Self {
        Self {
            total_budget,
            campaign_types,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_existing_tiers(mut self, tiers: Vec<RewardTier>) -> Self {
        self.existing_tiers = tiers;
        self
    }

    /// Request covering a campaign's budget, types and current tiers.
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self::new(campaign.total_budget, campaign.campaign_types.clone())
            .with_description(campaign.description.clone())
            .with_existing_tiers(campaign.reward_tiers.clone())
    }

    pub fn has_existing_tiers(&self) -> bool {
        !self.existing_tiers.is_empty()
    }
}

/// Source of tier proposals.
#[async_trait]
pub trait BudgetAdvisor: Send + Sync {
    /// Propose tiers for the request.
    ///
    /// With existing tiers the proposal should be the same list with amounts
    /// (and any missing ranks or descriptions) filled in.
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<RewardTier>, SuggestionError>;
}

/// Ask `advisor` for tiers and reconcile the answer with the request.
///
/// Never fails: on advisor error the existing tiers are returned unchanged,
/// or [`default_split`] when there are none. An empty answer also keeps the
/// existing tiers, but never invents a split: with none configured the
/// result is empty.
pub async fn suggest_allocation(
    advisor: &dyn BudgetAdvisor,
    request: &SuggestionRequest,
) -> Vec<RewardTier> {
    match advisor.suggest(request).await {
        Ok(suggested) if !suggested.is_empty() => {
            debug!(tiers = suggested.len(), "Advisor returned tiers");
            if request.has_existing_tiers() {
                merge_suggested(&request.existing_tiers, suggested)
            } else {
                label_generated(suggested)
            }
        }
        Ok(_) => {
            warn!("Advisor returned no tiers, keeping existing tiers");
            request.existing_tiers.clone()
        }
        Err(e) => {
            warn!(error = %e, "Advisor failed, using fallback");
            fallback_tiers(request)
        }
    }
}

/// Tiers to use when the advisor cannot help.
pub fn fallback_tiers(request: &SuggestionRequest) -> Vec<RewardTier> {
    if request.has_existing_tiers() {
        request.existing_tiers.clone()
    } else {
        default_split(request.total_budget, &request.campaign_types)
    }
}

/// Fixed split per campaign type: 20% to rank 1 and 5% each to ranks 2-10.
pub fn default_split(total_budget: u64, campaign_types: &[CampaignType]) -> Vec<RewardTier> {
    campaign_types
        .iter()
        .enumerate()
        .flat_map(|(i, tier_type)| {
            [
                RewardTier::new(format!("fb-{}-1", i), total_budget / 5)
                    .with_tier_type(*tier_type)
                    .with_ranks(Some(1), Some(1))
                    .with_condition("Rank 1")
                    .with_description("First Prize"),
                RewardTier::new(format!("fb-{}-2", i), total_budget / 20)
                    .with_tier_type(*tier_type)
                    .with_ranks(Some(2), Some(10))
                    .with_condition("Rank 2-10")
                    .with_description("Runner ups"),
            ]
        })
        .collect()
}

/// Lay each suggested tier over its original, matched by id and then by
/// position. The original id and condition are kept.
pub fn merge_suggested(existing: &[RewardTier], suggested: Vec<RewardTier>) -> Vec<RewardTier> {
    suggested
        .into_iter()
        .enumerate()
        .map(|(index, tier)| {
            let original = existing
                .iter()
                .find(|t| t.id == tier.id)
                .or_else(|| existing.get(index));

            match original {
                Some(original) => RewardTier {
                    id: original.id.clone(),
                    rank_start: tier.rank_start.or(original.rank_start),
                    rank_end: tier.rank_end.or(original.rank_end),
                    amount: tier.amount,
                    condition: if tier.condition.is_empty() {
                        original.condition.clone()
                    } else {
                        tier.condition
                    },
                    description: tier.description.or_else(|| original.description.clone()),
                    tier_type: tier.tier_type.or(original.tier_type),
                },
                None => tier,
            }
        })
        .collect()
}

/// Fresh ids and rank conditions for a newly generated structure.
fn label_generated(tiers: Vec<RewardTier>) -> Vec<RewardTier> {
    let stamp = Utc::now().timestamp_millis();
    tiers
        .into_iter()
        .enumerate()
        .map(|(index, tier)| {
            let condition = tier.range_label();
            RewardTier {
                id: format!("generated-tier-{}-{}", index, stamp),
                condition,
                ..tier
            }
        })
        .collect()
}

/// Tier as a remote advisor writes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedTier {
    #[serde(default)]
    id: String,
    tier_type: Option<CampaignType>,
    rank_start: Option<u32>,
    rank_end: Option<u32>,
    /// Per-winner amount; advisors may answer with fractions
    amount: f64,
    description: Option<String>,
}

impl From<SuggestedTier> for RewardTier {
    fn from(s: SuggestedTier) -> Self {
        RewardTier {
            id: s.id,
            rank_start: s.rank_start,
            rank_end: s.rank_end,
            amount: s.amount.max(0.0).floor() as u64,
            condition: String::new(),
            description: s.description.filter(|d| !d.trim().is_empty()),
            tier_type: s.tier_type,
        }
    }
}

/// Parse a remote advisor's answer.
///
/// The first JSON array in `text` is used, so answers wrapped in prose or
/// code fences are accepted.
pub fn parse_tier_response(text: &str) -> Result<Vec<RewardTier>, SuggestionError> {
    let start = text
        .find('[')
        .ok_or_else(|| SuggestionError::InvalidResponse("no JSON array found".to_string()))?;
    let end = find_matching_bracket(&text[start..])
        .ok_or_else(|| SuggestionError::InvalidResponse("unterminated JSON array".to_string()))?;

    let tiers: Vec<SuggestedTier> = serde_json::from_str(&text[start..=start + end])?;
    Ok(tiers.into_iter().map(RewardTier::from).collect())
}

/// Find the index of the matching closing bracket.
fn find_matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

const TIER_LABELS: [&str; 3] = ["Gold", "Silver", "Bronze"];
const CONSOLATION_LABEL: &str = "Consolation";

/// Offline advisor.
///
/// With existing tiers it assigns sequential ranks where they are missing,
/// labels unnamed tiers by position (Gold, Silver, Bronze, then Consolation)
/// and spreads the budget with weights of `1 / rank_start`, so rank 1 always
/// gets the most and the total payout never exceeds the budget. Without tiers
/// it splits the budget evenly across campaign types and builds a standard
/// structure for each.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAdvisor;

impl RuleBasedAdvisor {
    pub fn new() -> Self {
        Self
    }

    fn fill_existing(&self, request: &SuggestionRequest) -> Vec<RewardTier> {
        let mut tiers = request.existing_tiers.clone();
        assign_missing_ranks(&mut tiers);
        label_missing_descriptions(&mut tiers);
        allocate(request.total_budget, &mut tiers);
        tiers
    }

    fn generate(&self, request: &SuggestionRequest) -> Vec<RewardTier> {
        let share = request.total_budget / request.campaign_types.len() as u64;
        request
            .campaign_types
            .iter()
            .flat_map(|tier_type| {
                let mut tiers = standard_structure(*tier_type);
                allocate(share, &mut tiers);
                tiers
            })
            .collect()
    }
}

#[async_trait]
impl BudgetAdvisor for RuleBasedAdvisor {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<RewardTier>, SuggestionError> {
        if request.has_existing_tiers() {
            Ok(self.fill_existing(request))
        } else if request.campaign_types.is_empty() {
            Err(SuggestionError::Unavailable(
                "no campaign types to allocate".to_string(),
            ))
        } else {
            Ok(self.generate(request))
        }
    }
}

fn standard_structure(tier_type: CampaignType) -> Vec<RewardTier> {
    let ranges: &[(u32, u32, &str)] = match tier_type {
        CampaignType::LuckyDraw => &[(1, 10, "Lucky Winner")],
        CampaignType::Gmv | CampaignType::ContentVolume => {
            &[(1, 1, "Gold"), (2, 5, "Silver"), (6, 10, "Bronze")]
        }
    };
    ranges
        .iter()
        .map(|(start, end, label)| {
            RewardTier::default()
                .with_tier_type(tier_type)
                .with_ranks(Some(*start), Some(*end))
                .with_description(*label)
        })
        .collect()
}

/// Give unranked tiers the next free ranks of their type, in list order.
fn assign_missing_ranks(tiers: &mut [RewardTier]) {
    let mut next: HashMap<Option<CampaignType>, u32> = HashMap::new();
    for tier in tiers.iter().filter(|t| t.start() > 0) {
        let slot = next.entry(tier.tier_type).or_insert(1);
        *slot = (*slot).max(tier.end().max(tier.start()).saturating_add(1));
    }

    for tier in tiers.iter_mut() {
        if tier.start() > 0 && tier.end() >= tier.start() {
            continue;
        }
        let slot = next.entry(tier.tier_type).or_insert(1);
        let start = if tier.start() > 0 { tier.start() } else { *slot };
        tier.rank_start = Some(start);
        tier.rank_end = Some(start);
        *slot = (*slot).max(start.saturating_add(1));
    }
}

fn label_missing_descriptions(tiers: &mut [RewardTier]) {
    let positions: Vec<usize> = tiers
        .iter()
        .enumerate()
        .map(|(i, tier)| {
            tiers
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    other.tier_type == tier.tier_type
                        && (other.start(), *j) < (tier.start(), i)
                })
                .count()
        })
        .collect();

    for (tier, position) in tiers.iter_mut().zip(positions) {
        let unnamed = tier.description.as_deref().map_or(true, |d| d.trim().is_empty());
        if unnamed {
            let label = TIER_LABELS.get(position).copied().unwrap_or(CONSOLATION_LABEL);
            tier.description = Some(label.to_string());
        }
    }
}

/// Spread `budget` over `tiers` by `1 / rank_start`, rounding amounts down.
fn allocate(budget: u64, tiers: &mut [RewardTier]) {
    let weight = |tier: &RewardTier| 1.0 / f64::from(tier.start().max(1));
    let denominator: f64 = tiers
        .iter()
        .map(|t| weight(t) * t.winner_slots() as f64)
        .sum();
    if denominator <= 0.0 {
        return;
    }

    for tier in tiers.iter_mut() {
        tier.amount = (budget as f64 * weight(tier) / denominator).floor() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::reconcile_configuration;

    struct CannedAdvisor(Result<Vec<RewardTier>, String>);

    #[async_trait]
    impl BudgetAdvisor for CannedAdvisor {
        async fn suggest(&self, _: &SuggestionRequest) -> Result<Vec<RewardTier>, SuggestionError> {
            self.0.clone().map_err(SuggestionError::Unavailable)
        }
    }

    fn existing() -> Vec<RewardTier> {
        vec![
            RewardTier::new("t1", 0)
                .with_ranks(Some(1), Some(1))
                .with_condition("Top seller")
                .with_tier_type(CampaignType::Gmv),
            RewardTier::new("t2", 0)
                .with_ranks(Some(2), Some(5))
                .with_tier_type(CampaignType::Gmv),
        ]
    }

    #[test]
    fn test_default_split() {
        let tiers = default_split(10_000, &[CampaignType::Gmv, CampaignType::LuckyDraw]);
        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers[0].id, "fb-0-1");
        assert_eq!(tiers[0].amount, 2_000);
        assert_eq!(tiers[0].condition, "Rank 1");
        assert_eq!(tiers[1].id, "fb-0-2");
        assert_eq!(tiers[1].amount, 500);
        assert_eq!(tiers[1].winner_slots(), 9);
        assert_eq!(tiers[1].description.as_deref(), Some("Runner ups"));
        assert_eq!(tiers[3].id, "fb-1-2");
        assert_eq!(tiers[3].tier_type, Some(CampaignType::LuckyDraw));
    }

    #[test]
    fn test_default_split_floors() {
        let tiers = default_split(999, &[CampaignType::Gmv]);
        assert_eq!(tiers[0].amount, 199);
        assert_eq!(tiers[1].amount, 49);
    }

    #[test]
    fn test_failure_without_tiers_uses_default_split() {
        let advisor = CannedAdvisor(Err("timeout".to_string()));
        let request = SuggestionRequest::new(10_000, vec![CampaignType::Gmv]);

        let tiers = tokio_test::block_on(suggest_allocation(&advisor, &request));
        assert_eq!(tiers, default_split(10_000, &[CampaignType::Gmv]));
    }

    #[test]
    fn test_failure_with_tiers_keeps_them() {
        let advisor = CannedAdvisor(Err("timeout".to_string()));
        let request = SuggestionRequest::new(10_000, vec![CampaignType::Gmv])
            .with_existing_tiers(existing());

        let tiers = tokio_test::block_on(suggest_allocation(&advisor, &request));
        assert_eq!(tiers, existing());
    }

    #[test]
    fn test_empty_answer_keeps_existing_tiers() {
        let advisor = CannedAdvisor(Ok(vec![]));

        let fresh = SuggestionRequest::new(1_000, vec![CampaignType::ContentVolume]);
        assert!(tokio_test::block_on(suggest_allocation(&advisor, &fresh)).is_empty());

        let configured = fresh.with_existing_tiers(existing());
        assert_eq!(
            tokio_test::block_on(suggest_allocation(&advisor, &configured)),
            existing()
        );
    }

    #[test]
    fn test_merge_keeps_original_ids() {
        let suggested = vec![
            RewardTier::new("t1", 6_000).with_description("Gold"),
            RewardTier::new("renamed", 1_000).with_ranks(Some(2), Some(5)),
        ];

        let merged = merge_suggested(&existing(), suggested);
        assert_eq!(merged[0].id, "t1");
        assert_eq!(merged[0].amount, 6_000);
        assert_eq!(merged[0].condition, "Top seller");
        assert_eq!(merged[0].rank_end, Some(1));
        assert_eq!(merged[0].description.as_deref(), Some("Gold"));
        // Matched by position
        assert_eq!(merged[1].id, "t2");
        assert_eq!(merged[1].amount, 1_000);
    }

    #[test]
    fn test_merge_extra_suggestion_passes_through() {
        let suggested = vec![
            RewardTier::new("x", 1),
            RewardTier::new("y", 2),
            RewardTier::new("z", 3),
        ];
        let merged = merge_suggested(&existing(), suggested);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2].id, "z");
    }

    #[test]
    fn test_generated_tiers_get_ids_and_conditions() {
        let advisor = CannedAdvisor(Ok(vec![
            RewardTier::new("", 3_000).with_ranks(Some(1), Some(1)),
            RewardTier::new("", 500).with_ranks(Some(2), Some(10)),
        ]));
        let request = SuggestionRequest::new(10_000, vec![CampaignType::Gmv]);

        let tiers = tokio_test::block_on(suggest_allocation(&advisor, &request));
        assert!(tiers[0].id.starts_with("generated-tier-0-"));
        assert!(tiers[1].id.starts_with("generated-tier-1-"));
        assert_eq!(tiers[0].condition, "Rank 1");
        assert_eq!(tiers[1].condition, "Rank 2-10");
    }

    #[test]
    fn test_parse_tier_response() {
        let text = r#"Here you go:
```json
[{"id":"t1","tierType":"GMV","rankStart":1,"rankEnd":1,"amount":4999.9,"description":"Top [1]"},
 {"tierType":"LUCKY_DRAW","rankStart":1,"rankEnd":10,"amount":100,"description":""}]
```"#;

        let tiers = parse_tier_response(text).unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].amount, 4_999);
        assert_eq!(tiers[0].description.as_deref(), Some("Top [1]"));
        assert_eq!(tiers[1].tier_type, Some(CampaignType::LuckyDraw));
        assert_eq!(tiers[1].id, "");
        assert_eq!(tiers[1].description, None);
    }

    #[test]
    fn test_parse_tier_response_invalid() {
        assert!(matches!(
            parse_tier_response("sorry, no budget today"),
            Err(SuggestionError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_tier_response("[{\"amount\": 1}"),
            Err(SuggestionError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_tier_response("[{\"amount\": \"lots\"}]"),
            Err(SuggestionError::Json(_))
        ));
    }

    #[test]
    fn test_rule_based_fills_existing() {
        let mut tiers = existing();
        tiers.push(RewardTier::new("t3", 0).with_tier_type(CampaignType::Gmv));
        let request = SuggestionRequest::new(50_000, vec![CampaignType::Gmv]).with_existing_tiers(tiers);

        let filled = tokio_test::block_on(RuleBasedAdvisor::new().suggest(&request)).unwrap();

        assert_eq!(filled.len(), 3);
        assert_eq!(filled[2].id, "t3");
        assert_eq!(filled[2].rank_start, Some(6));
        assert_eq!(filled[2].rank_end, Some(6));
        assert_eq!(filled[0].description.as_deref(), Some("Gold"));
        assert_eq!(filled[1].description.as_deref(), Some("Silver"));
        assert_eq!(filled[2].description.as_deref(), Some("Bronze"));

        assert!(filled[0].amount > filled[1].amount);
        assert!(filled[1].amount > filled[2].amount);
        let used = reconcile_configuration(50_000, &filled).used_budget;
        assert!(used <= 50_000);
        assert!(used > 49_900);
    }

    #[test]
    fn test_rule_based_ranks_after_max_rank_tier() {
        let tiers = vec![
            RewardTier::new("all", 0).with_ranks(Some(1), Some(u32::MAX)),
            RewardTier::new("extra", 0),
        ];
        let request = SuggestionRequest::new(1_000, vec![]).with_existing_tiers(tiers);

        let filled = tokio_test::block_on(RuleBasedAdvisor::new().suggest(&request)).unwrap();

        assert_eq!(filled.len(), 2);
        assert_eq!(filled[1].rank_start, Some(u32::MAX));
        assert_eq!(filled[1].rank_end, Some(u32::MAX));
    }

    #[test]
    fn test_rule_based_generates_per_type() {
        let request =
            SuggestionRequest::new(60_000, vec![CampaignType::Gmv, CampaignType::LuckyDraw]);

        let tiers = tokio_test::block_on(suggest_allocation(&RuleBasedAdvisor::new(), &request));

        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers[0].condition, "Rank 1");
        assert_eq!(tiers[1].condition, "Rank 2-5");
        assert_eq!(tiers[3].tier_type, Some(CampaignType::LuckyDraw));
        assert_eq!(tiers[3].amount, 3_000);

        let gmv: Vec<RewardTier> = tiers[..3].to_vec();
        assert!(reconcile_configuration(30_000, &gmv).used_budget <= 30_000);
        assert!(reconcile_configuration(60_000, &tiers).used_budget <= 60_000);
    }

    #[test]
    fn test_rule_based_without_types_falls_back_to_nothing() {
        let request = SuggestionRequest::new(60_000, vec![]);
        let advisor = RuleBasedAdvisor::new();

        assert!(tokio_test::block_on(advisor.suggest(&request)).is_err());
        assert!(tokio_test::block_on(suggest_allocation(&advisor, &request)).is_empty());
    }

    #[test]
    fn test_request_from_campaign() {
        let day = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let campaign = Campaign::new("c1", "Launch", 80_000, day, day)
            .with_types(vec![CampaignType::ContentVolume])
            .with_tiers(existing());

        let request = SuggestionRequest::from_campaign(&campaign);
        assert_eq!(request.total_budget, 80_000);
        assert_eq!(request.campaign_types, vec![CampaignType::ContentVolume]);
        assert!(request.has_existing_tiers());
    }
}
