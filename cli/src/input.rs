//! Campaign files.
//!
//! A file holds either one campaign object or an array of them, in the
//! dashboard's camelCase JSON.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tierboard::{Campaign, CampaignStore};

#[derive(Deserialize)]
#[serde(untagged)]
enum CampaignFile {
    Many(Vec<Campaign>),
    One(Box<Campaign>),
}

/// Load every campaign in `path` into a store, preserving file order.
pub fn load_store(path: &Path) -> Result<CampaignStore> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: CampaignFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse campaigns in {}", path.display()))?;

    let campaigns = match parsed {
        CampaignFile::Many(campaigns) => campaigns,
        CampaignFile::One(campaign) => vec![*campaign],
    };
    Ok(CampaignStore::with_campaigns(campaigns))
}

/// Write the store back to `path` as a JSON array.
pub fn save_store(path: &Path, store: &CampaignStore) -> Result<()> {
    let text = serde_json::to_string_pretty(store.list())?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Pick the campaign to work on.
///
/// Without an id the file must contain exactly one campaign.
pub fn select<'a>(store: &'a CampaignStore, id: Option<&str>) -> Result<&'a Campaign> {
    match id {
        Some(id) => store
            .get(id)
            .with_context(|| format!("Campaign {} not found", id)),
        None => match store.list() {
            [only] => Ok(only),
            [] => bail!("No campaigns in file"),
            many => bail!(
                "File holds {} campaigns, pick one with --campaign",
                many.len()
            ),
        },
    }
}
