use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::metrics::{best_times_in, engagement::parse_rate};
use crate::storage::{keys, KvStore, StorageBackend, StoreError};
use crate::{format_number, Profile};

pub const GREETING: &str = "Hello! I'm your Instagram AI assistant. I can help you with growth strategies, posting times, engagement tips, and hashtag usage. What would you like to know?";

const HELP: &str = "I can help you analyze your Instagram metrics. Try asking about:\n- Followers count\n- Engagement rate\n- Recent posts\n- Best posting times\n- Growth strategies";

const GENERIC_BEST_TIMES: &str = "Based on your recent posts, the best times to post are:\n- Weekdays: 6-8 PM\n- Weekends: 11 AM-2 PM\nThese times typically show higher engagement rates.";

const GROWTH_TIPS: &str = "To improve your Instagram presence:\n1. Post consistently (3-4 times per week)\n2. Use relevant hashtags\n3. Engage with your audience\n4. Share authentic content\n5. Utilize all Instagram features (Posts, Stories, Reels)";

const GOOD_ENGAGEMENT_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: i64,
}

pub fn reply(query: &str, profile: Option<&Profile>) -> String {
    reply_in(query, profile, &Local)
}

pub fn reply_in<Tz: TimeZone>(query: &str, profile: Option<&Profile>, tz: &Tz) -> String {
    let query = query.to_lowercase();

    if query.contains("followers") {
        return match profile {
            Some(profile) => format!(
                "The account has {} followers.",
                format_number(profile.followers as f64)
            ),
            None => HELP.to_string(),
        };
    }

    if query.contains("engagement rate") {
        return match profile {
            Some(profile) => {
                let rate = parse_rate(&profile.engagement_rate);
                let verdict = if rate > GOOD_ENGAGEMENT_THRESHOLD {
                    "This is considered good engagement!"
                } else {
                    "There might be room for improvement in engagement."
                };
                format!(
                    "The current engagement rate is {}. {}",
                    profile.engagement_rate, verdict
                )
            }
            None => HELP.to_string(),
        };
    }

    if query.contains("recent post") {
        return match profile.and_then(|profile| profile.recent_posts.first()) {
            Some(post) => format!(
                "The most recent post received {} likes and {} comments. The caption was: \"{}\"",
                format_number(post.likes as f64),
                format_number(post.comments as f64),
                post.caption
            ),
            None => HELP.to_string(),
        };
    }

    if query.contains("best time") {
        let slots = profile
            .map(|profile| best_times_in(&profile.recent_posts, tz))
            .unwrap_or_default();
        if slots.is_empty() {
            return GENERIC_BEST_TIMES.to_string();
        }
        let hours: Vec<String> = slots.iter().map(|slot| slot.label()).collect();
        return format!(
            "Based on your recent posts, your strongest posting hours are: {}.",
            hours.join(", ")
        );
    }

    if query.contains("improve") || query.contains("growth") {
        return GROWTH_TIPS.to_string();
    }

    HELP.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new(now_ms: i64) -> Self {
        Self {
            messages: vec![greeting(now_ms)],
        }
    }

    pub fn from_messages(messages: Vec<ChatMessage>, now_ms: i64) -> Self {
        if messages.is_empty() {
            return Self::new(now_ms);
        }
        Self { messages }
    }

    pub async fn load<B: StorageBackend>(store: &KvStore<B>, now_ms: i64) -> Self {
        Self::from_messages(store.get(keys::CHAT_MESSAGES, Vec::new()).await, now_ms)
    }

    pub async fn save<B: StorageBackend>(&self, store: &KvStore<B>) -> Result<(), StoreError> {
        store.set(keys::CHAT_MESSAGES, &self.messages).await
    }

    pub fn send(
        &mut self,
        text: &str,
        profile: Option<&Profile>,
        now_ms: i64,
    ) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        let answer = reply(text, profile);
        let id = self.next_id(now_ms);
        self.messages.push(ChatMessage {
            id,
            text: text.to_string(),
            is_bot: false,
            timestamp: now_ms,
        });
        let id = self.next_id(now_ms + 1);
        self.messages.push(ChatMessage {
            id,
            text: answer,
            is_bot: true,
            timestamp: now_ms + 1,
        });
        self.messages.last()
    }

    // position keeps ids unique when sends land within a millisecond
    fn next_id(&self, timestamp: i64) -> String {
        format!("{}-{}", timestamp, self.messages.len())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

fn greeting(now_ms: i64) -> ChatMessage {
    ChatMessage {
        id: "1".to_string(),
        text: GREETING.to_string(),
        is_bot: true,
        timestamp: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use crate::{Post, PostMetrics};
    use chrono::Utc;

    fn profile(rate: &str) -> Profile {
        // 2024-03-18T18:00:00Z
        let post = Post::new(
            "p1".to_string(),
            "Sunset run #fit".to_string(),
            String::new(),
            false,
            1_710_784_800_000,
            PostMetrics {
                likes: 1_234,
                comments: 56,
                ..PostMetrics::default()
            },
        );
        Profile {
            username: "runner".to_string(),
            followers: 12_500,
            following: 300,
            posts: 1,
            engagement_rate: rate.to_string(),
            is_private: false,
            profile_pic: String::new(),
            recent_posts: vec![post],
            demographics: None,
            insights: None,
        }
    }

    #[test]
    fn followers_are_formatted() {
        let profile = profile("4.2%");
        assert_eq!(
            reply("How many FOLLOWERS?", Some(&profile)),
            "The account has 12,500 followers."
        );
    }

    #[test]
    fn engagement_rate_verdict_uses_threshold() {
        let good = reply("engagement rate please", Some(&profile("4.20%")));
        assert!(good.ends_with("This is considered good engagement!"));
        let weak = reply("engagement rate please", Some(&profile("3.00%")));
        assert!(weak.contains("room for improvement"));
    }

    #[test]
    fn recent_post_quotes_caption() {
        let answer = reply("my recent post?", Some(&profile("1%")));
        assert_eq!(
            answer,
            "The most recent post received 1,234 likes and 56 comments. The caption was: \"Sunset run #fit\""
        );
    }

    #[test]
    fn best_time_uses_post_hours_when_available() {
        let answer = reply_in("best time to post", Some(&profile("1%")), &Utc);
        assert!(answer.contains("18:00"));
        assert_eq!(reply_in("best time", None, &Utc), GENERIC_BEST_TIMES);
    }

    #[test]
    fn profile_topics_need_a_profile() {
        assert_eq!(reply("followers", None), HELP);
        assert_eq!(reply("recent post", None), HELP);
    }

    #[test]
    fn growth_and_fallback() {
        assert_eq!(reply("how do I improve", None), GROWTH_TIPS);
        assert_eq!(reply("growth?", None), GROWTH_TIPS);
        assert_eq!(reply("hello", None), HELP);
    }

    #[test]
    fn first_matching_topic_wins() {
        let answer = reply("followers and engagement rate", Some(&profile("5%")));
        assert!(answer.starts_with("The account has"));
    }

    #[test]
    fn transcript_starts_with_greeting_and_ignores_blank_input() {
        let mut transcript = Transcript::new(10);
        assert_eq!(transcript.messages().len(), 1);
        assert!(transcript.messages()[0].is_bot);
        assert!(transcript.send("   ", None, 20).is_none());
        assert_eq!(transcript.messages().len(), 1);

        let answer = transcript.send("hi", None, 20).cloned().unwrap();
        assert!(answer.is_bot);
        assert_eq!(answer.timestamp, 21);
        assert_eq!(transcript.messages().len(), 3);
        assert!(!transcript.messages()[1].is_bot);
    }

    #[test]
    fn rapid_sends_get_distinct_ids() {
        let mut transcript = Transcript::new(10);
        transcript.send("growth", None, 20);
        transcript.send("growth", None, 21);

        let mut ids: Vec<&str> = transcript.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn transcript_round_trips_through_store() {
        let store = KvStore::open(MemoryBackend::new()).await.unwrap();
        let fresh = Transcript::load(&store, 5).await;
        assert_eq!(fresh.messages().len(), 1);

        let mut transcript = fresh;
        transcript.send("growth", None, 6);
        transcript.save(&store).await.unwrap();

        let reloaded = Transcript::load(&store, 99).await;
        assert_eq!(reloaded, transcript);
    }
}
