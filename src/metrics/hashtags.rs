use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Post;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagStat {
    pub tag: String,
    pub uses: u64,
    pub total_engagement: u64,
}

impl HashtagStat {
    pub fn average_engagement(&self) -> f64 {
        if self.uses == 0 {
            return 0.0;
        }
        self.total_engagement as f64 / self.uses as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingHashtag {
    pub tag: String,
    pub count: u64,
}

pub fn top_hashtags(posts: &[Post], limit: usize) -> Vec<HashtagStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<HashtagStat> = Vec::new();

    for post in posts {
        for tag in &post.hashtags {
            let slot = *index.entry(tag.as_str()).or_insert_with(|| {
                stats.push(HashtagStat {
                    tag: tag.clone(),
                    uses: 0,
                    total_engagement: 0,
                });
                stats.len() - 1
            });
            let stat = &mut stats[slot];
            stat.uses += 1;
            stat.total_engagement = stat.total_engagement.saturating_add(post.engagement);
        }
    }

    stats.sort_by(|a, b| {
        b.uses.cmp(&a.uses).then_with(|| {
            b.average_engagement()
                .partial_cmp(&a.average_engagement())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    stats.truncate(limit);
    stats
}

pub fn fallback_trending_hashtags() -> Vec<TrendingHashtag> {
    [
        ("#photography", 1200),
        ("#travel", 800),
        ("#fashion", 750),
        ("#food", 600),
        ("#art", 550),
        ("#nature", 500),
        ("#fitness", 450),
        ("#beauty", 400),
        ("#lifestyle", 350),
        ("#music", 300),
    ]
    .into_iter()
    .map(|(tag, count)| TrendingHashtag {
        tag: tag.to_string(),
        count,
    })
    .collect()
}
