use chrono::Utc;
use serde_json::json;
use socialscope::calendar::{EventStore, EventStatus, NewEvent};
use socialscope::chat::Transcript;
use socialscope::metrics::{analyze_profile_in, EngagementTier};
use socialscope::profile::{resolve, resolve_seeded, FALLBACK_POST_COUNT};
use socialscope::sentiment::{self, Sentiment};
use socialscope::storage::{keys, FileBackend, KvStore, MemoryBackend};
use socialscope::{MediaType, Profile};

use rand::{rngs::StdRng, SeedableRng};

// 2024-03-18T18:00:00Z and 2024-03-19T09:30:00Z
const EVENING: i64 = 1_710_784_800_000;
const MORNING: i64 = 1_710_840_600_000;

fn upstream_payload() -> serde_json::Value {
    json!({
        "username": "coastal.eats",
        "followers_count": "2000",
        "following_count": 180,
        "media_count": 42,
        "is_private": 0,
        "recent_posts": [
            {
                "id": "a1",
                "caption": "Brunch by the sea #food #brunch",
                "likes_count": 90,
                "comments_count": 10,
                "timestamp": EVENING
            },
            {
                "id": 77,
                "caption": "Behind the scenes #food",
                "likes_count": "40",
                "comments_count": null,
                "is_video": true,
                "video_url": "https://cdn.example/v.mp4",
                "timestamp": "2024-03-19T09:30:00Z"
            },
            "not a post",
            { "caption": "no id, no time" }
        ]
    })
}

#[test]
fn upstream_profile_flows_into_report() {
    let payload = upstream_payload();
    let mut rng = StdRng::seed_from_u64(1);
    let profile = resolve("ignored", Some(&payload), &mut rng, MORNING + 1_000);

    assert_eq!(profile.username, "coastal.eats");
    assert_eq!(profile.followers, 2_000);
    assert!(!profile.is_private);
    assert_eq!(profile.recent_posts.len(), 3);
    assert_eq!(profile.recent_posts[1].id, "77");
    assert_eq!(profile.recent_posts[1].timestamp, MORNING);
    assert_eq!(profile.recent_posts[2].timestamp, MORNING + 1_000);
    // (100 + 40 + 0) / (2000 * 3) * 100
    assert_eq!(profile.engagement_rate, "2.33%");

    let report = analyze_profile_in(&profile, &Utc);
    assert_eq!(report.engagement_series.len(), 3);
    assert_eq!(report.engagement_series[0].date, "2024-03-18");
    assert_eq!(report.engagement_series[0].engagement, 100);
    assert_eq!(
        report.content_mix.entries(),
        vec![(MediaType::Image, 2), (MediaType::Video, 1)]
    );
    assert_eq!(report.best_times[0].hour, 18);
    assert_eq!(report.best_times[0].engagement, 100);
    assert_eq!(report.top_hashtags[0].tag, "#food");
    assert_eq!(report.top_hashtags[0].uses, 2);
    assert_eq!(report.tier, EngagementTier::Low);
}

#[test]
fn malformed_upstream_degrades_to_fallback() {
    for payload in [json!(null), json!([1, 2, 3]), json!("oops")] {
        let profile = resolve_seeded("sunny.days", Some(&payload), Some(5));
        assert_eq!(profile.username, "sunny.days");
        assert_eq!(profile.recent_posts.len(), FALLBACK_POST_COUNT);
        assert_eq!(profile.engagement_rate, "3.5%");
    }
}

#[test]
fn fallback_is_stable_per_username() {
    let first = resolve_seeded("Sunny.Days", None, None);
    let second = resolve_seeded("sunny.days", None, None);
    assert_eq!(first.followers, second.followers);
    assert_eq!(first.recent_posts[0].likes, second.recent_posts[0].likes);
}

#[tokio::test]
async fn widget_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = KvStore::open(FileBackend::new(path.clone())).await.unwrap();
        let profile = resolve_seeded("persisted", None, Some(11));
        store.set(keys::PROFILE, &profile).await.unwrap();

        let mut events = EventStore::load(&store).await;
        events
            .add(NewEvent::new("2024-05-01", "Launch teaser"), 1)
            .unwrap();
        events.save(&store).await.unwrap();

        let mut transcript = Transcript::load(&store, 1).await;
        transcript.send("how many followers?", Some(&profile), 2);
        transcript.save(&store).await.unwrap();
    }

    let store = KvStore::open(FileBackend::new(path)).await.unwrap();
    let profile: Option<Profile> = store.get(keys::PROFILE, None).await;
    let profile = profile.unwrap();
    assert_eq!(profile.username, "persisted");

    let events = EventStore::load(&store).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events.events()[0].status, EventStatus::Draft);

    let transcript = Transcript::load(&store, 3).await;
    assert_eq!(transcript.messages().len(), 3);
    assert!(transcript.messages()[2].text.starts_with("The account has"));
}

#[tokio::test]
async fn corrupt_entries_fall_back_per_key() {
    let store = KvStore::open(MemoryBackend::new()).await.unwrap();
    store.set(keys::CALENDAR_EVENTS, &"garbage").await.unwrap();
    store.set(keys::THEME, &false).await.unwrap();

    assert!(EventStore::load(&store).await.is_empty());
    assert!(!store.get(keys::THEME, true).await);
}

#[test]
fn sentiment_over_captions() {
    let result = sentiment::analyze("Such a beautiful and happy morning");
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.raw_score, 2);
    // 2 / 6 words * 10
    assert_eq!(result.normalized_score, 3);
    assert_eq!(result.caption_suggestions.len(), 5);
    assert_eq!(result.tips.len(), 3);
}
