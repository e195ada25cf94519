pub mod calendar;
pub mod chat;
pub mod config;
pub mod followers;
pub mod ideas;
pub mod metrics;
pub mod profile;
pub mod sentiment;
pub mod storage;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Za-z_]+").expect("valid hashtag regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Carousel,
}

impl MediaType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "image" | "photo" | "pic" => Some(MediaType::Image),
            "video" | "vid" | "reel" => Some(MediaType::Video),
            "carousel" | "album" => Some(MediaType::Carousel),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Video => "Video",
            MediaType::Carousel => "Carousel",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostMetrics {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub reach: u64,
    pub impressions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub caption: String,
    pub image_url: String,
    pub video_url: Option<String>,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub timestamp: i64,
    pub is_video: bool,
    pub engagement: u64,
    pub hashtags: Vec<String>,
    pub reach: u64,
    pub impressions: u64,
}

impl Post {
    pub fn new(
        id: String,
        caption: String,
        image_url: String,
        is_video: bool,
        timestamp: i64,
        metrics: PostMetrics,
    ) -> Self {
        let hashtags = extract_hashtags(&caption);
        Self {
            id,
            caption,
            image_url,
            video_url: None,
            likes: metrics.likes,
            comments: metrics.comments,
            shares: metrics.shares,
            saves: metrics.saves,
            timestamp,
            is_video,
            engagement: metrics.likes.saturating_add(metrics.comments),
            hashtags,
            reach: metrics.reach,
            impressions: metrics.impressions,
        }
    }

    pub fn with_video_url(mut self, video_url: Option<String>) -> Self {
        self.video_url = video_url;
        self
    }

    pub fn media_type(&self) -> MediaType {
        if self.is_video {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShare {
    pub city: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age: BTreeMap<String, f64>,
    pub gender: BTreeMap<String, f64>,
    pub top_locations: Vec<LocationShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagInsight {
    pub tag: String,
    pub uses: u64,
    pub engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingTime {
    pub day: String,
    pub time: String,
    pub engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub reach_growth: f64,
    pub impressions_growth: f64,
    pub top_performing_hashtags: Vec<HashtagInsight>,
    pub best_posting_times: Vec<PostingTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub engagement_rate: String,
    pub is_private: bool,
    pub profile_pic: String,
    pub recent_posts: Vec<Post>,
    pub demographics: Option<Demographics>,
    pub insights: Option<Insights>,
}

pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}

pub(crate) fn parse_int_prefix(value: &str) -> u64 {
    let trimmed = value.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.starts_with('-') {
        return 0;
    }
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    digits[..end].parse::<u64>().unwrap_or(0)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_rate(percent: f64) -> String {
    if !percent.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", percent)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtags_keep_order_and_case() {
        let tags = extract_hashtags("Great day! #sunny #Friday123");
        assert_eq!(tags, vec!["#sunny".to_string(), "#Friday123".to_string()]);
    }

    #[test]
    fn hashtags_keep_duplicates() {
        let tags = extract_hashtags("#a text #b #a");
        assert_eq!(tags, vec!["#a", "#b", "#a"]);
    }

    #[test]
    fn lone_hash_is_not_a_hashtag() {
        assert!(extract_hashtags("# nothing here #").is_empty());
    }

    #[test]
    fn post_engagement_is_likes_plus_comments() {
        let post = Post::new(
            "p1".to_string(),
            "hello #world".to_string(),
            "img".to_string(),
            false,
            0,
            PostMetrics {
                likes: 120,
                comments: 30,
                shares: 9,
                ..PostMetrics::default()
            },
        );
        assert_eq!(post.engagement, 150);
        assert_eq!(post.hashtags, vec!["#world"]);
        assert_eq!(post.media_type(), MediaType::Image);
    }

    #[test]
    fn int_prefix_behaves_like_lenient_parse() {
        assert_eq!(parse_int_prefix("42"), 42);
        assert_eq!(parse_int_prefix("  17abc"), 17);
        assert_eq!(parse_int_prefix("abc"), 0);
        assert_eq!(parse_int_prefix("-5"), 0);
        assert_eq!(parse_int_prefix(""), 0);
    }

    #[test]
    fn rate_formatting_guards_non_finite() {
        assert_eq!(format_rate(3.456), "3.46%");
        assert_eq!(format_rate(f64::NAN), "0.00%");
        assert_eq!(format_rate(f64::INFINITY), "0.00%");
    }

    #[test]
    fn numbers_get_thousands_separators() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(999.0), "999");
    }
}
