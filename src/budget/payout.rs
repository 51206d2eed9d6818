//! Payout ledger.
//!
//! Rewarded leaderboard entries are drafted into unpaid [`PayoutItem`]s; once
//! money moves an item is marked paid and its amount added to the campaign's
//! `spent`.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::campaign::{Campaign, CampaignPatch, PayoutItem, PayoutStatus, StoreError};
use crate::leaderboard::Leaderboard;

/// Errors from payout bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoutError {
    #[error("Payout not found: {0}")]
    NotFound(String),

    #[error("Payout already paid: {0}")]
    AlreadyPaid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for payout operations.
pub type PayoutResult<T> = Result<T, PayoutError>;

/// Draft one unpaid payout per rewarded entry, in rank order.
pub fn draft_payouts(leaderboard: &Leaderboard) -> Vec<PayoutItem> {
    leaderboard
        .rewarded()
        .map(|entry| PayoutItem {
            id: format!("payout-{}", entry.creator_id),
            creator_id: entry.creator_id.clone(),
            creator_name: entry.name.clone(),
            creator_avatar: entry.avatar.clone(),
            amount: entry.reward_amount,
            reason: format!("Rank {} - {}", entry.rank, entry.tier_label),
            status: PayoutStatus::Unpaid,
            paid_at: None,
        })
        .collect()
}

/// Copy of `payouts` with `id` marked paid on `paid_at`.
pub fn mark_paid(
    payouts: &[PayoutItem],
    id: &str,
    paid_at: NaiveDate,
) -> PayoutResult<Vec<PayoutItem>> {
    let target = payouts
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| PayoutError::NotFound(id.to_string()))?;
    if target.status == PayoutStatus::Paid {
        return Err(PayoutError::AlreadyPaid(id.to_string()));
    }

    Ok(payouts
        .iter()
        .map(|p| {
            if p.id == id {
                PayoutItem {
                    status: PayoutStatus::Paid,
                    paid_at: Some(paid_at),
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect())
}

/// Total still owed.
pub fn outstanding(payouts: &[PayoutItem]) -> u64 {
    total_with_status(payouts, PayoutStatus::Unpaid)
}

/// Total already paid out.
pub fn paid_total(payouts: &[PayoutItem]) -> u64 {
    total_with_status(payouts, PayoutStatus::Paid)
}

fn total_with_status(payouts: &[PayoutItem], status: PayoutStatus) -> u64 {
    payouts
        .iter()
        .filter(|p| p.status == status)
        .fold(0u64, |acc, p| acc.saturating_add(p.amount))
}

/// Patch that settles one of the campaign's payouts and books it as spent.
pub fn settle_payout(
    campaign: &Campaign,
    payout_id: &str,
    paid_at: NaiveDate,
) -> PayoutResult<CampaignPatch> {
    let payouts = mark_paid(&campaign.payouts, payout_id, paid_at)?;
    let amount = payouts
        .iter()
        .find(|p| p.id == payout_id)
        .map(|p| p.amount)
        .unwrap_or(0);

    info!(campaign_id = %campaign.id, payout_id, amount, "Payout settled");

    Ok(CampaignPatch::new()
        .with_spent(campaign.spent.saturating_add(amount))
        .with_payouts(payouts))
}
