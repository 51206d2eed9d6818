//! Budget reconciliation, allocation suggestions and payouts.
//!
//! # Overview
//!
//! - **ReconcileConfig**: warning/critical thresholds and the platform fee rate
//! - **reconcile_configuration**: worst-case spend of the configured tiers
//! - **reconcile_live**: payout owed under the current leaderboard
//! - **BudgetReport**: both of the above with statuses and tier overlaps
//! - **BudgetAdvisor**: source of tier proposals, with a fallback-safe caller
//! - **draft_payouts**: payout ledger entries for the current winners
//!
//! # Example
//!
//! ```ignore
//! use tierboard::budget::{BudgetReport, ReconcileConfig};
//! use tierboard::leaderboard::build_leaderboard;
//!
//! let board = build_leaderboard(&campaign.submission_list, &campaign.reward_tiers);
//! let report = BudgetReport::new(
//!     campaign.total_budget,
//!     &campaign.reward_tiers,
//!     &board,
//!     &ReconcileConfig::default(),
//! );
//!
//! if report.configured.over_budget {
//!     println!("{}", report.format("THB"));
//! }
//! ```

mod config;
mod payout;
mod reconcile;
mod suggest;

pub use config::ReconcileConfig;
pub use payout::{
    draft_payouts, mark_paid, outstanding, paid_total, settle_payout, PayoutError, PayoutResult,
};
pub use reconcile::{
    find_overlaps, next_rank, reconcile_configuration, reconcile_live, BudgetReport, BudgetStatus,
    ConfiguredBudget, LiveBudget, TierOverlap,
};
pub use suggest::{
    default_split, fallback_tiers, merge_suggested, parse_tier_response, suggest_allocation,
    BudgetAdvisor, RuleBasedAdvisor, SuggestionError, SuggestionRequest,
};
