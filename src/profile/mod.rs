pub mod synthetic;
pub mod upstream;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::metrics::profile_engagement_rate;
use crate::{
    now_ms, Demographics, HashtagInsight, Insights, LocationShare, Post, PostMetrics,
    PostingTime, Profile,
};

pub use synthetic::{fallback_profile, DAY_MS, FALLBACK_ENGAGEMENT_RATE, FALLBACK_POST_COUNT};
pub use upstream::{parse_upstream, UpstreamProfile};

pub fn resolve<R: Rng>(
    username: &str,
    upstream: Option<&Value>,
    rng: &mut R,
    now_ms: i64,
) -> Profile {
    let Some(payload) = upstream else {
        debug!(username, "no upstream payload, using fallback profile");
        return fallback_profile(username, rng, now_ms);
    };

    match parse_upstream(payload) {
        Ok(parsed) => from_upstream(username, parsed, now_ms),
        Err(reason) => {
            warn!(username, %reason, "upstream profile unusable, using fallback profile");
            fallback_profile(username, rng, now_ms)
        }
    }
}

pub fn resolve_seeded(username: &str, upstream: Option<&Value>, seed: Option<u64>) -> Profile {
    let seed = seed.unwrap_or_else(|| username_seed(username));
    let mut rng = StdRng::seed_from_u64(seed);
    resolve(username, upstream, &mut rng, now_ms())
}

pub fn username_seed(username: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(username.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn from_upstream(requested: &str, parsed: UpstreamProfile, now_ms: i64) -> Profile {
    let username = parsed
        .username
        .unwrap_or_else(|| requested.to_string());
    let recent_posts = transform_posts(parsed.recent_posts, now_ms);
    debug!(
        username = %username,
        posts = recent_posts.len(),
        "transformed upstream profile"
    );

    let defaults = default_demographics();
    let demographics = match parsed.demographics {
        Some(found) => Demographics {
            age: found.age_ranges.unwrap_or(defaults.age),
            gender: found.gender.unwrap_or(defaults.gender),
            top_locations: found.top_locations.unwrap_or(defaults.top_locations),
        },
        None => defaults,
    };

    let insights = parsed
        .insights
        .map(|found| Insights {
            reach_growth: found.reach_growth,
            impressions_growth: found.impressions_growth,
            top_performing_hashtags: found.top_hashtags,
            best_posting_times: found.best_times,
        })
        .unwrap_or_default();

    Profile {
        engagement_rate: profile_engagement_rate(&recent_posts, parsed.followers_count),
        profile_pic: parsed
            .profile_pic_url
            .unwrap_or_else(|| profile_pic_url(&username)),
        username,
        followers: parsed.followers_count,
        following: parsed.following_count,
        posts: parsed.media_count,
        is_private: parsed.is_private,
        recent_posts,
        demographics: Some(demographics),
        insights: Some(insights),
    }
}

fn transform_posts(posts: Vec<upstream::UpstreamPost>, now_ms: i64) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .enumerate()
        .map(|(idx, post)| {
            let mut id = post.id.unwrap_or_else(|| format!("post-{}-{}", now_ms, idx));
            if !seen.insert(id.clone()) {
                id = format!("{}-{}", id, idx);
                seen.insert(id.clone());
            }
            let timestamp = upstream::coerce_timestamp(post.timestamp.as_ref()).unwrap_or(now_ms);
            let image_url = post.image_url.unwrap_or_else(|| post_image_url(&id));
            Post::new(
                id,
                post.caption.unwrap_or_default(),
                image_url,
                post.is_video,
                timestamp,
                PostMetrics {
                    likes: post.likes_count,
                    comments: post.comments_count,
                    shares: post.shares_count,
                    saves: post.saves_count,
                    reach: post.reach_count,
                    impressions: post.impressions_count,
                },
            )
            .with_video_url(post.video_url)
        })
        .collect()
}

pub(crate) fn profile_pic_url(username: &str) -> String {
    format!(
        "https://source.unsplash.com/100x100/?profile&u={}",
        urlencoding::encode(username)
    )
}

pub(crate) fn post_image_url(post_id: &str) -> String {
    format!(
        "https://source.unsplash.com/600x600/?instagram&pid={}",
        urlencoding::encode(post_id)
    )
}

pub fn default_demographics() -> Demographics {
    let age = [("18-24", 25.0), ("25-34", 45.0), ("35-44", 20.0), ("45+", 10.0)];
    let gender = [("female", 65.0), ("male", 35.0)];
    let locations = [("New York", 15.0), ("Los Angeles", 12.0), ("London", 8.0)];

    Demographics {
        age: to_distribution(&age),
        gender: to_distribution(&gender),
        top_locations: locations
            .iter()
            .map(|(city, percentage)| LocationShare {
                city: city.to_string(),
                percentage: *percentage,
            })
            .collect(),
    }
}

pub fn fallback_insights() -> Insights {
    Insights {
        reach_growth: 12.5,
        impressions_growth: 8.3,
        top_performing_hashtags: [
            ("#photography", 1_200, 4.5),
            ("#travel", 800, 3.8),
            ("#lifestyle", 600, 3.2),
        ]
        .into_iter()
        .map(|(tag, uses, engagement)| HashtagInsight {
            tag: tag.to_string(),
            uses,
            engagement,
        })
        .collect(),
        best_posting_times: [
            ("Monday", "18:00", 4.2),
            ("Wednesday", "12:00", 3.9),
            ("Friday", "20:00", 4.5),
        ]
        .into_iter()
        .map(|(day, time, engagement)| PostingTime {
            day: day.to_string(),
            time: time.to_string(),
            engagement,
        })
        .collect(),
    }
}

fn to_distribution(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}
