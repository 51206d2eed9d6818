//! Terminal output.

use colored::*;
use tierboard::budget::{outstanding, paid_total, BudgetStatus};
use tierboard::campaign::{Kpi, PayoutItem, PayoutStatus};
use tierboard::{BudgetReport, Campaign, Leaderboard, RewardTier};

fn status_label(status: BudgetStatus) -> ColoredString {
    match status {
        BudgetStatus::Ok => status.as_str().green(),
        BudgetStatus::Warning => status.as_str().yellow(),
        BudgetStatus::Critical => status.as_str().red(),
        BudgetStatus::Exceeded => status.as_str().red().bold(),
    }
}

pub fn header(campaign: &Campaign) {
    println!("{} {}", campaign.title.bold(), format!("({})", campaign.id).dimmed());
}

pub fn leaderboard(board: &Leaderboard, currency: &str) {
    if board.is_empty() {
        println!("{}", "No submissions yet".dimmed());
        return;
    }

    println!(
        "{:>4}  {:<20} {:>12} {:>10} {:>7} {:>12}  {}",
        "Rank", "Creator", "Views", "Likes", "Videos", "Reward", "Tier"
    );
    for entry in board {
        let reward = if entry.is_rewarded() {
            format!("{} {}", entry.reward_amount, currency).green()
        } else {
            "-".dimmed()
        };
        println!(
            "{:>4}  {:<20} {:>12} {:>10} {:>7} {:>12}  {}",
            entry.rank,
            entry.name,
            entry.total_views,
            entry.total_likes,
            format!("{}/{}", entry.approved_count, entry.video_count),
            reward,
            entry.tier_label
        );
    }
}

pub fn budget(report: &BudgetReport, currency: &str) {
    let configured = &report.configured;
    let live = &report.live;

    println!(
        "Budget        {} {} (+{} {} platform fee)",
        configured.total_budget, currency, report.platform_fee, currency
    );
    println!(
        "Tier total    {} {} ({:.1}%) [{}]",
        configured.used_budget,
        currency,
        configured.usage_ratio() * 100.0,
        status_label(report.configured_status)
    );
    if configured.over_budget {
        println!(
            "              {}",
            format!("over budget by {} {}", configured.overage(), currency).red()
        );
    } else {
        println!("              remaining {} {}", configured.remaining, currency);
    }
    println!(
        "Projected     {} {} ({:.1}%) [{}]",
        live.projected_payout,
        currency,
        live.usage_ratio() * 100.0,
        status_label(report.live_status)
    );
    for overlap in &report.overlaps {
        println!(
            "{} tiers {} and {} overlap; {} wins",
            "warning:".yellow(),
            overlap.first,
            overlap.second,
            overlap.first
        );
    }
}

pub fn tiers(tiers: &[RewardTier], currency: &str) {
    for tier in tiers {
        let kind = tier.tier_type.map(|t| t.as_str()).unwrap_or("-");
        println!(
            "{:<16} {:<12} {:>10} {} x{:<4} {}",
            kind,
            tier.range_label(),
            tier.amount,
            currency,
            tier.winner_slots(),
            tier.description.as_deref().unwrap_or("").dimmed()
        );
    }
}

pub fn kpi(kpi: &Kpi) {
    println!("Creators      {}", kpi.creators);
    println!("Submissions   {}", kpi.submissions);
    println!("Total views   {}", kpi.total_views);
    println!("Engagement    {}", kpi.engagement);
}

pub fn payouts(payouts: &[PayoutItem], currency: &str) {
    for payout in payouts {
        let status = match payout.status {
            PayoutStatus::Paid => "paid".green(),
            PayoutStatus::Unpaid => "unpaid".yellow(),
        };
        println!(
            "{:<24} {:<20} {:>10} {}  {:<8} {}",
            payout.id, payout.creator_name, payout.amount, currency, status, payout.reason
        );
    }
    println!(
        "Outstanding {} {}, paid {} {}",
        outstanding(payouts),
        currency,
        paid_total(payouts),
        currency
    );
}
