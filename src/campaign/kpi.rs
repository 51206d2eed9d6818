//! Campaign KPI snapshot.

use std::collections::HashSet;

use tracing::debug;

use super::model::{Campaign, Kpi};
use super::patch::CampaignPatch;
use crate::leaderboard::{format_compact, parse_metric};

/// Recompute the headline numbers from the current submission list.
///
/// Engagement is total likes over total views, in percent with one decimal.
pub fn recompute_kpi(campaign: &Campaign) -> Kpi {
    let mut creators = HashSet::new();
    let mut views = 0u64;
    let mut likes = 0u64;

    for submission in &campaign.submission_list {
        creators.insert(submission.creator_id.as_str());
        views = views.saturating_add(parse_metric(&submission.views));
        likes = likes.saturating_add(parse_metric(&submission.likes));
    }

    let engagement = if views == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", likes as f64 / views as f64 * 100.0)
    };

    Kpi {
        creators: creators.len() as u32,
        submissions: campaign.submission_list.len() as u32,
        total_views: format_compact(views),
        engagement,
    }
}

/// Patch that replaces the cached KPI with a fresh one.
pub fn refresh_kpi_patch(campaign: &Campaign) -> CampaignPatch {
    let kpi = recompute_kpi(campaign);
    debug!(campaign_id = %campaign.id, ?kpi, "KPI recomputed");
    CampaignPatch::new().with_kpi(kpi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Submission;
    use chrono::NaiveDate;

    fn campaign_with(subs: Vec<Submission>) -> Campaign {
        let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        Campaign::new("1", "KPI", 10_000, day, day).with_submissions(subs)
    }

    fn sub(id: &str, creator: &str, views: &str, likes: &str) -> Submission {
        let day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        Submission::new(id, creator, id, day).with_metrics(views, likes)
    }

    #[test]
    fn test_recompute_kpi() {
        let campaign = campaign_with(vec![
            sub("a", "c1", "100K", "8K"),
            sub("b", "c1", "40,000", "3,000"),
            sub("c", "c2", "10K", "1K"),
        ]);

        let kpi = recompute_kpi(&campaign);
        assert_eq!(kpi.creators, 2);
        assert_eq!(kpi.submissions, 3);
        assert_eq!(kpi.total_views, "150.0K");
        assert_eq!(kpi.engagement, "8.0%");
    }

    #[test]
    fn test_recompute_kpi_empty() {
        let kpi = recompute_kpi(&campaign_with(vec![]));
        assert_eq!(kpi.creators, 0);
        assert_eq!(kpi.total_views, "0.0K");
        assert_eq!(kpi.engagement, "0%");
    }

    #[test]
    fn test_refresh_patch_overwrites_stale_cache() {
        let mut campaign = campaign_with(vec![sub("a", "c1", "2M", "0")]);
        campaign.kpi = Some(Kpi {
            creators: 12,
            submissions: 45,
            total_views: "150K".to_string(),
            engagement: "8.5%".to_string(),
        });

        let next = refresh_kpi_patch(&campaign).apply(&campaign);
        let kpi = next.kpi.unwrap();
        assert_eq!(kpi.submissions, 1);
        assert_eq!(kpi.total_views, "2.0M");
    }
}
