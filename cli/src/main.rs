mod input;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tierboard::budget::{
    draft_payouts, settle_payout, suggest_allocation, RuleBasedAdvisor, SuggestionRequest,
};
use tierboard::campaign::review::approve_pending_for_creator;
use tierboard::campaign::{recompute_kpi, CampaignPatch};
use tierboard::leaderboard::build_leaderboard_with;
use tierboard::settings::DEFAULT_SETTINGS_FILE;
use tierboard::{BudgetReport, Campaign, Leaderboard, Settings};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reward-tier leaderboards and budget checks for creator campaigns")]
struct Cli {
    /// Settings file (defaults to ./tierboard.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Args)]
struct Target {
    /// Campaign JSON file
    file: PathBuf,
    /// Campaign id, required when the file holds several
    #[arg(long)]
    campaign: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the ranked leaderboard with rewards
    Leaderboard {
        #[command(flatten)]
        target: Target,
    },
    /// Reconcile tiers and standings against the budget
    Report {
        #[command(flatten)]
        target: Target,
    },
    /// Suggest reward amounts for the campaign's tiers
    Suggest {
        #[command(flatten)]
        target: Target,
        /// Store the suggested tiers in the file
        #[arg(long)]
        write: bool,
    },
    /// Recompute headline numbers
    Kpi {
        #[command(flatten)]
        target: Target,
        /// Store the refreshed numbers in the file
        #[arg(long)]
        write: bool,
    },
    /// Show payouts, drafting them from the leaderboard when none exist
    Payouts {
        #[command(flatten)]
        target: Target,
        /// Store drafted payouts in the file
        #[arg(long)]
        write: bool,
    },
    /// Mark a payout as paid and add it to the spent total
    Settle {
        #[command(flatten)]
        target: Target,
        /// Payout id
        payout: String,
        /// Payment date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Approve every pending submission of one creator
    Approve {
        #[command(flatten)]
        target: Target,
        /// Creator id
        creator: String,
    },
    /// Print the effective settings as TOML
    Settings,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(settings_path(cli.config.as_deref()).as_deref())
        .context("Failed to load settings")?;
    debug!(currency = %settings.currency, "Settings ready");

    match cli.cmd {
        Command::Leaderboard { target } => {
            let store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let board = leaderboard_for(campaign, &settings);
            if cli.json {
                print_json(&board)?;
            } else {
                render::header(campaign);
                render::leaderboard(&board, &settings.currency);
            }
        }
        Command::Report { target } => {
            let store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let board = leaderboard_for(campaign, &settings);
            let report = BudgetReport::new(
                campaign.total_budget,
                &campaign.reward_tiers,
                &board,
                &settings.budget,
            );
            if cli.json {
                print_json(&report)?;
            } else {
                render::header(campaign);
                render::budget(&report, &settings.currency);
            }
        }
        Command::Suggest { target, write } => {
            let mut store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let request = SuggestionRequest::from_campaign(campaign);
            let tiers = suggest_allocation(&RuleBasedAdvisor::new(), &request).await;

            if cli.json {
                print_json(&tiers)?;
            } else {
                render::header(campaign);
                render::tiers(&tiers, &settings.currency);
            }
            if write {
                let id = campaign.id.clone();
                save_patch(&mut store, &target.file, &id, CampaignPatch::new().with_reward_tiers(tiers))?;
            }
        }
        Command::Kpi { target, write } => {
            let mut store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let kpi = recompute_kpi(campaign);

            if cli.json {
                print_json(&kpi)?;
            } else {
                render::header(campaign);
                render::kpi(&kpi);
            }
            if write {
                let id = campaign.id.clone();
                save_patch(&mut store, &target.file, &id, CampaignPatch::new().with_kpi(kpi))?;
            }
        }
        Command::Payouts { target, write } => {
            let mut store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let drafted = campaign.payouts.is_empty();
            let payouts = if drafted {
                draft_payouts(&leaderboard_for(campaign, &settings))
            } else {
                campaign.payouts.clone()
            };

            if cli.json {
                print_json(&payouts)?;
            } else {
                render::header(campaign);
                render::payouts(&payouts, &settings.currency);
            }
            if write && drafted {
                let id = campaign.id.clone();
                save_patch(&mut store, &target.file, &id, CampaignPatch::new().with_payouts(payouts))?;
            }
        }
        Command::Settle { target, payout, date } => {
            let mut store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let paid_at = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let patch = settle_payout(campaign, &payout, paid_at)?;

            let id = campaign.id.clone();
            let updated = save_patch(&mut store, &target.file, &id, patch)?;
            if cli.json {
                print_json(&updated.payouts)?;
            } else {
                println!("Settled {} on {}; spent is now {} {}", payout, paid_at, updated.spent, settings.currency);
            }
        }
        Command::Approve { target, creator } => {
            let mut store = input::load_store(&target.file)?;
            let campaign = input::select(&store, target.campaign.as_deref())?;
            let (patch, approved) = approve_pending_for_creator(campaign, &creator);

            let id = campaign.id.clone();
            save_patch(&mut store, &target.file, &id, patch)?;
            if cli.json {
                print_json(&serde_json::json!({ "creatorId": creator, "approved": approved }))?;
            } else {
                println!("Approved {} submission(s) from {}", approved, creator);
            }
        }
        Command::Settings => {
            print!("{}", settings.to_toml_string()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit path, else the working-directory file (picked up by
/// `Settings::load`), else the user config dir.
fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if Path::new(DEFAULT_SETTINGS_FILE).exists() {
        return None;
    }
    dirs::config_dir()
        .map(|dir| dir.join("tierboard").join(DEFAULT_SETTINGS_FILE))
        .filter(|path| path.exists())
}

fn leaderboard_for(campaign: &Campaign, settings: &Settings) -> Leaderboard {
    build_leaderboard_with(
        &campaign.submission_list,
        &campaign.reward_tiers,
        settings.leaderboard.tie_break,
    )
}

fn save_patch(
    store: &mut tierboard::CampaignStore,
    path: &Path,
    id: &str,
    patch: CampaignPatch,
) -> Result<Campaign> {
    let updated = store.update(id, &patch)?.clone();
    input::save_store(path, store)?;
    info!(campaign_id = id, fields = ?patch.changed_fields(), path = %path.display(), "Campaign saved");
    Ok(updated)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
