use rand::Rng;

use crate::profile::{default_demographics, fallback_insights, post_image_url, profile_pic_url};
use crate::{Post, PostMetrics, Profile};

pub const FALLBACK_POST_COUNT: usize = 6;
pub const FALLBACK_ENGAGEMENT_RATE: &str = "3.5%";
pub const DAY_MS: i64 = 86_400_000;

pub fn fallback_profile<R: Rng>(username: &str, rng: &mut R, now_ms: i64) -> Profile {
    let followers = rng.gen_range(10_000..100_000);
    let following = rng.gen_range(500..2_000);
    let posts = rng.gen_range(100..1_000);

    Profile {
        username: username.to_string(),
        followers,
        following,
        posts,
        engagement_rate: FALLBACK_ENGAGEMENT_RATE.to_string(),
        is_private: false,
        profile_pic: profile_pic_url(username),
        recent_posts: fallback_posts(rng, now_ms),
        demographics: Some(default_demographics()),
        insights: Some(fallback_insights()),
    }
}

fn fallback_posts<R: Rng>(rng: &mut R, now_ms: i64) -> Vec<Post> {
    (0..FALLBACK_POST_COUNT)
        .map(|idx| {
            let id = format!("fallback-{}", idx);
            let metrics = PostMetrics {
                likes: rng.gen_range(1_000..10_000),
                comments: rng.gen_range(50..500),
                shares: rng.gen_range(20..200),
                saves: rng.gen_range(30..300),
                reach: rng.gen_range(3_000..10_000),
                impressions: rng.gen_range(4_000..10_000),
            };
            Post::new(
                id.clone(),
                format!("Amazing post {} #instagram #lifestyle", idx + 1),
                post_image_url(&id),
                false,
                now_ms - idx as i64 * DAY_MS,
                metrics,
            )
        })
        .collect()
}
