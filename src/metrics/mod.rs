pub mod content;
pub mod engagement;
pub mod hashtags;
pub mod timing;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::Profile;

pub use content::{content_mix, ContentMix};
pub use engagement::{
    average_engagement_rate, engagement_rate, engagement_rate_value, engagement_series,
    engagement_series_in, post_engagement_rate, profile_engagement_rate, EngagementPoint,
    EngagementTier,
};
pub use hashtags::{fallback_trending_hashtags, top_hashtags, HashtagStat, TrendingHashtag};
pub use timing::{
    best_times, best_times_in, format_hour, posting_heatmap, posting_heatmap_in, PostingHeatmap,
    TimeSlot, BEST_TIMES_LIMIT, WEEKDAYS,
};

const TOP_HASHTAGS_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub engagement_series: Vec<EngagementPoint>,
    pub content_mix: ContentMix,
    pub best_times: Vec<TimeSlot>,
    pub average_engagement_rate: f64,
    pub tier: EngagementTier,
    pub top_hashtags: Vec<HashtagStat>,
}

pub fn analyze_profile(profile: &Profile) -> AnalyticsReport {
    analyze_profile_in(profile, &Local)
}

pub fn analyze_profile_in<Tz: TimeZone>(profile: &Profile, tz: &Tz) -> AnalyticsReport {
    let posts = &profile.recent_posts;
    let average = average_engagement_rate(posts, profile.followers);
    AnalyticsReport {
        engagement_series: engagement_series_in(posts, tz),
        content_mix: content_mix(posts),
        best_times: best_times_in(posts, tz),
        average_engagement_rate: average,
        tier: EngagementTier::from_rate(average),
        top_hashtags: top_hashtags(posts, TOP_HASHTAGS_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Post, PostMetrics};
    use chrono::Utc;

    fn post(id: &str, likes: u64, comments: u64, timestamp: i64, is_video: bool) -> Post {
        Post::new(
            id.to_string(),
            format!("post {} #daily", id),
            String::new(),
            is_video,
            timestamp,
            PostMetrics {
                likes,
                comments,
                ..PostMetrics::default()
            },
        )
    }

    #[test]
    fn report_combines_all_series() {
        let profile = Profile {
            username: "someone".to_string(),
            followers: 1_000,
            following: 10,
            posts: 2,
            engagement_rate: "0.00%".to_string(),
            is_private: false,
            profile_pic: String::new(),
            recent_posts: vec![
                post("a", 40, 10, 9 * 3_600_000, false),
                post("b", 20, 10, 18 * 3_600_000, true),
            ],
            demographics: None,
            insights: None,
        };

        let report = analyze_profile_in(&profile, &Utc);
        assert_eq!(report.engagement_series.len(), 2);
        assert_eq!(report.content_mix.image, 1);
        assert_eq!(report.content_mix.video, 1);
        assert_eq!(report.best_times[0].hour, 9);
        assert!((report.average_engagement_rate - 4.0).abs() < 1e-9);
        assert_eq!(report.tier, EngagementTier::Good);
        assert_eq!(report.top_hashtags[0].tag, "#daily");
    }
}
