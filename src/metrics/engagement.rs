use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::{format_rate, Post};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementPoint {
    pub date: String,
    pub engagement: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngagementTier {
    Low,
    Good,
    High,
}

impl EngagementTier {
    pub fn from_rate(percent: f64) -> Self {
        if percent >= 5.0 {
            EngagementTier::High
        } else if percent >= 3.0 {
            EngagementTier::Good
        } else {
            EngagementTier::Low
        }
    }

    pub fn from_formatted(rate: &str) -> Self {
        Self::from_rate(parse_rate(rate))
    }

    pub fn label(self) -> &'static str {
        match self {
            EngagementTier::Low => "Low",
            EngagementTier::Good => "Good",
            EngagementTier::High => "High",
        }
    }
}

pub fn parse_rate(rate: &str) -> f64 {
    rate.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn engagement_series(posts: &[Post]) -> Vec<EngagementPoint> {
    engagement_series_in(posts, &Local)
}

pub fn engagement_series_in<Tz: TimeZone>(posts: &[Post], tz: &Tz) -> Vec<EngagementPoint> {
    posts
        .iter()
        .map(|post| EngagementPoint {
            date: tz
                .timestamp_millis_opt(post.timestamp)
                .single()
                .map(|moment| moment.date_naive().format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            engagement: post.engagement,
            likes: post.likes,
            comments: post.comments,
        })
        .collect()
}

pub fn engagement_rate_value(likes: u64, comments: u64, followers: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    (likes.saturating_add(comments)) as f64 / followers as f64 * 100.0
}

pub fn engagement_rate(likes: u64, comments: u64, followers: u64) -> String {
    format_rate(engagement_rate_value(likes, comments, followers))
}

pub fn post_engagement_rate(post: &Post, followers: u64) -> String {
    engagement_rate(post.likes, post.comments, followers)
}

pub fn average_engagement_rate(posts: &[Post], followers: u64) -> f64 {
    if posts.is_empty() || followers == 0 {
        return 0.0;
    }
    let total: f64 = posts
        .iter()
        .map(|post| engagement_rate_value(post.likes, post.comments, followers))
        .sum();
    total / posts.len() as f64
}

pub fn profile_engagement_rate(posts: &[Post], followers: u64) -> String {
    if posts.is_empty() || followers == 0 {
        return format_rate(0.0);
    }
    let total: u64 = posts.iter().map(|post| post.engagement).sum();
    let rate = total as f64 / (followers as f64 * posts.len() as f64) * 100.0;
    format_rate(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PostMetrics;
    use chrono::Utc;

    fn post(likes: u64, comments: u64, timestamp: i64) -> Post {
        Post::new(
            format!("p{}", timestamp),
            String::new(),
            String::new(),
            false,
            timestamp,
            PostMetrics {
                likes,
                comments,
                ..PostMetrics::default()
            },
        )
    }

    #[test]
    fn zero_followers_is_zero_percent() {
        assert_eq!(engagement_rate(500, 20, 0), "0.00%");
        assert_eq!(profile_engagement_rate(&[post(1, 1, 0)], 0), "0.00%");
        assert_eq!(average_engagement_rate(&[post(1, 1, 0)], 0), 0.0);
    }

    #[test]
    fn rate_has_two_decimals() {
        assert_eq!(engagement_rate(150, 25, 5_000), "3.50%");
        assert_eq!(engagement_rate(1, 0, 3), "33.33%");
    }

    #[test]
    fn series_keeps_input_order_and_totals() {
        let posts = vec![post(10, 1, 2_000_000_000), post(30, 3, 1_000), post(20, 2, 86_400_000)];
        let series = engagement_series_in(&posts, &Utc);

        let engagements: Vec<u64> = series.iter().map(|point| point.engagement).collect();
        assert_eq!(engagements, vec![11, 33, 22]);

        let expected: u64 = posts.iter().map(|p| p.likes + p.comments).sum();
        let actual: u64 = series.iter().map(|point| point.engagement).sum();
        assert_eq!(actual, expected);
        assert_eq!(series[2].date, "1970-01-02");
    }

    #[test]
    fn profile_rate_divides_by_post_count() {
        let posts = vec![post(90, 10, 0), post(40, 10, 1)];
        // 150 / (1000 * 2) * 100
        assert_eq!(profile_engagement_rate(&posts, 1_000), "7.50%");
        assert_eq!(profile_engagement_rate(&[], 1_000), "0.00%");
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(EngagementTier::from_rate(5.0), EngagementTier::High);
        assert_eq!(EngagementTier::from_rate(4.99), EngagementTier::Good);
        assert_eq!(EngagementTier::from_rate(2.5), EngagementTier::Low);
        assert_eq!(EngagementTier::from_formatted("3.5%"), EngagementTier::Good);
        assert_eq!(EngagementTier::from_formatted("n/a"), EngagementTier::Low);
    }
}
