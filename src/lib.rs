//! Reward-tier leaderboards and budget reconciliation for creator campaigns.
//!
//! A brand runs a [`campaign::Campaign`] with a total prize budget and a list
//! of rank-based [`campaign::RewardTier`]s. Creators apply, submit content and
//! accumulate views. From that state this crate derives:
//!
//! - a ranked [`leaderboard::Leaderboard`] with the reward each rank earns,
//! - the live projected payout against the budget,
//! - the configuration-time worst-case spend implied by the tiers.
//!
//! # Example
//!
//! ```ignore
//! use tierboard::budget::{reconcile_configuration, reconcile_live};
//! use tierboard::leaderboard::build_leaderboard;
//!
//! let board = build_leaderboard(&campaign.submission_list, &campaign.reward_tiers);
//! let live = reconcile_live(campaign.total_budget, &board);
//! let configured = reconcile_configuration(campaign.total_budget, &campaign.reward_tiers);
//!
//! if live.over_budget {
//!     // Current standings would pay out more than the budget
//! }
//! ```

pub mod budget;
pub mod campaign;
pub mod leaderboard;
pub mod settings;

pub use budget::{BudgetReport, ConfiguredBudget, LiveBudget, ReconcileConfig};
pub use campaign::{Campaign, CampaignPatch, CampaignStore, RewardTier, Submission};
pub use leaderboard::{build_leaderboard, Leaderboard, LeaderboardEntry};
pub use settings::Settings;
