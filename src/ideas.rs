use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostIdea {
    pub title: &'static str,
    pub description: &'static str,
    pub caption: &'static str,
    pub hashtags: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Niche {
    pub name: &'static str,
    pub ideas: &'static [PostIdea],
    pub hashtags: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageAnalysis {
    pub captions: &'static [&'static str],
    pub hashtags: &'static [&'static str],
    pub mood: &'static str,
    pub colors: &'static [&'static str],
}

pub const NICHES: &[Niche] = &[
    Niche {
        name: "fitness",
        ideas: &[
            PostIdea {
                title: "Morning Workout Routine",
                description: "Share your energizing morning workout routine",
                caption: "🌅 Starting the day strong with my morning workout routine! Here's how I kickstart my day with energy and positivity. What's your favorite morning exercise? 💪",
                hashtags: &["#MorningWorkout", "#FitnessMotivation", "#HealthyLifestyle"],
            },
            PostIdea {
                title: "Healthy Meal Prep",
                description: "Showcase your weekly meal preparation",
                caption: "Meal prep Sunday in full swing! 🥗 Preparing healthy meals for the week ahead is key to staying on track with fitness goals. Swipe to see my full prep routine! 🍽️",
                hashtags: &["#MealPrep", "#HealthyEating", "#FitnessFoodie"],
            },
        ],
        hashtags: &["#FitnessJourney", "#WorkoutMotivation", "#HealthyLifestyle", "#FitFam"],
    },
    Niche {
        name: "travel",
        ideas: &[
            PostIdea {
                title: "Hidden Gems",
                description: "Showcase lesser-known local spots",
                caption: "Discovered this hidden paradise today! 🌴 Sometimes the best places are off the beaten path. Swipe to see this magical spot that's not in any guidebook! ✨",
                hashtags: &["#HiddenGem", "#TravelSecrets", "#Wanderlust"],
            },
            PostIdea {
                title: "Travel Tips",
                description: "Share practical travel advice",
                caption: "✈️ My top travel hacks that have saved me time and money! These are the tips I wish I knew before starting my journey. Save this post for your next trip! 🌍",
                hashtags: &["#TravelTips", "#TravelHacks", "#Wanderlust"],
            },
        ],
        hashtags: &["#TravelBlog", "#Wanderlust", "#ExploreMore", "#TravelPhotography"],
    },
    Niche {
        name: "food",
        ideas: &[
            PostIdea {
                title: "Recipe Tutorial",
                description: "Step-by-step cooking guide",
                caption: "👨‍🍳 Making my signature pasta dish! This recipe has been in my family for generations and I'm finally sharing it with you all. Save this for later! 🍝",
                hashtags: &["#FoodieLife", "#Cooking", "#RecipeShare"],
            },
            PostIdea {
                title: "Restaurant Review",
                description: "Share your dining experience",
                caption: "Found the most amazing hidden restaurant! 🍽️ This place serves authentic cuisine that will transport you straight to Italy. Must-try dishes in my highlights! ⭐",
                hashtags: &["#FoodReview", "#Foodiegram", "#DiningOut"],
            },
        ],
        hashtags: &["#Foodie", "#FoodBlogger", "#FoodPhotography", "#Yummy"],
    },
];

pub const IMAGE_ANALYSIS: ImageAnalysis = ImageAnalysis {
    captions: &[
        "✨ Adventure awaits at every corner",
        "🌟 Living life in full color",
        "🎯 Making memories that last forever",
        "🌈 Finding beauty in everyday moments",
        "💫 When life gives you perfect lighting",
    ],
    hashtags: &[
        "#photography",
        "#lifestyle",
        "#inspiration",
        "#moments",
        "#photooftheday",
        "#instagood",
        "#explore",
    ],
    mood: "Vibrant & Energetic",
    colors: &["#FF6B6B", "#4ECDC4", "#45B7D1"],
};

pub fn niche(name: &str) -> Option<&'static Niche> {
    let wanted = name.trim();
    NICHES
        .iter()
        .find(|niche| niche.name.eq_ignore_ascii_case(wanted))
}

pub fn niche_names() -> impl Iterator<Item = &'static str> {
    NICHES.iter().map(|niche| niche.name)
}

pub async fn generate_ideas(name: &str, latency: Duration) -> Option<&'static Niche> {
    let found = niche(name)?;
    simulate_latency(latency).await;
    debug!(niche = found.name, ideas = found.ideas.len(), "generated post ideas");
    Some(found)
}

pub async fn analyze_image(latency: Duration) -> ImageAnalysis {
    simulate_latency(latency).await;
    IMAGE_ANALYSIS
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn niche_lookup_ignores_case() {
        assert_eq!(niche("Travel").map(|n| n.name), Some("travel"));
        assert_eq!(niche(" FOOD ").map(|n| n.name), Some("food"));
        assert!(niche("gaming").is_none());
    }

    #[test]
    fn every_niche_has_ideas_and_hashtags() {
        assert_eq!(niche_names().collect::<Vec<_>>(), vec!["fitness", "travel", "food"]);
        for niche in NICHES {
            assert_eq!(niche.ideas.len(), 2);
            assert_eq!(niche.hashtags.len(), 4);
            assert!(niche
                .ideas
                .iter()
                .all(|idea| idea.hashtags.iter().all(|tag| tag.starts_with('#'))));
        }
    }

    #[tokio::test]
    async fn generation_without_latency_is_immediate() {
        let found = generate_ideas("fitness", Duration::ZERO).await.unwrap();
        assert_eq!(found.ideas[0].title, "Morning Workout Routine");
        assert!(generate_ideas("knitting", Duration::ZERO).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn image_analysis_waits_for_latency() {
        let started = tokio::time::Instant::now();
        let analysis = analyze_image(Duration::from_millis(1_500)).await;
        assert!(started.elapsed() >= Duration::from_millis(1_500));
        assert_eq!(analysis.captions.len(), 5);
        assert_eq!(analysis.hashtags.len(), 7);
        assert_eq!(analysis.mood, "Vibrant & Energetic");
        assert_eq!(analysis.colors, &["#FF6B6B", "#4ECDC4", "#45B7D1"]);
    }
}
