use serde::Serialize;

pub const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "amazing", "awesome", "beautiful", "perfect", "happy", "joy", "excited",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "hate",
    "bad",
    "terrible",
    "awful",
    "poor",
    "worst",
    "sad",
    "angry",
    "disappointed",
];

const KEYWORD_PLACEHOLDER: &str = "{keywords}";
const DEFAULT_KEYWORDS: &str = "moments like these";
const SCORE_WINDOW: usize = 10;

const POSITIVE_TEMPLATES: &[&str] = &[
    "✨ Living for these moments! {keywords} #blessed",
    "🌟 When {keywords} come together perfectly! #goodvibes",
    "💫 Couldn't be happier! {keywords} #gratitude",
    "🎉 This is what dreams are made of! {keywords} #happiness",
    "🌈 Pure joy captured in one moment! {keywords} #positivevibes",
];

const NEGATIVE_TEMPLATES: &[&str] = &[
    "🤔 Learning and growing through challenges. {keywords} #growth",
    "💭 Sometimes we need to reflect... {keywords} #mindfulness",
    "🌱 Every setback is a setup for a comeback! {keywords} #motivation",
    "💪 Embracing the journey, both ups and downs. {keywords} #progress",
    "🎯 Focused on solutions, not problems. {keywords} #determination",
];

const NEUTRAL_TEMPLATES: &[&str] = &[
    "📸 Capturing life as it happens. {keywords} #lifestyle",
    "🎬 Another day, another adventure. {keywords} #journey",
    "🌅 Simple moments, lasting memories. {keywords} #life",
    "💫 Just being present. {keywords} #mindful",
    "🌿 Taking it all in. {keywords} #moments",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    fn from_score(score: i64) -> Self {
        if score > 0 {
            Sentiment::Positive
        } else if score < 0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    fn templates(self) -> &'static [&'static str] {
        match self {
            Sentiment::Positive => POSITIVE_TEMPLATES,
            Sentiment::Negative => NEGATIVE_TEMPLATES,
            Sentiment::Neutral => NEUTRAL_TEMPLATES,
        }
    }

    pub fn writing_tips(self) -> &'static [&'static str] {
        match self {
            Sentiment::Positive => &[
                "Keep the positive tone while staying authentic",
                "Consider adding specific details about what makes it great",
                "Use this enthusiasm to encourage engagement",
            ],
            Sentiment::Negative => &[
                "Try to focus on constructive feedback",
                "Consider a more balanced perspective",
                "Add suggestions for improvement",
            ],
            Sentiment::Neutral => &[
                "Add more descriptive language",
                "Include your personal perspective",
                "Be more specific about your thoughts",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub text: String,
    pub sentiment: Sentiment,
    pub raw_score: u32,
    pub normalized_score: u8,
    pub keywords: Vec<String>,
    pub tips: Vec<String>,
    pub caption_suggestions: Vec<String>,
}

pub fn analyze(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let mut score = 0i64;
    let mut keywords = Vec::new();
    for word in &words {
        if POSITIVE_WORDS.contains(word) {
            score += 1;
            keywords.push(word.to_string());
        }
        if NEGATIVE_WORDS.contains(word) {
            score -= 1;
            keywords.push(word.to_string());
        }
    }

    let sentiment = Sentiment::from_score(score);
    let raw_score = score.unsigned_abs() as u32;

    SentimentResult {
        text: text.to_string(),
        sentiment,
        raw_score,
        normalized_score: normalize(raw_score, words.len()),
        tips: sentiment
            .writing_tips()
            .iter()
            .map(|tip| tip.to_string())
            .collect(),
        caption_suggestions: caption_suggestions(sentiment, &keywords),
        keywords,
    }
}

fn normalize(raw_score: u32, word_count: usize) -> u8 {
    let window = word_count.min(SCORE_WINDOW);
    if window == 0 {
        return 0;
    }
    let scaled = (raw_score as f64 / window as f64 * 10.0).round();
    scaled.clamp(0.0, 10.0) as u8
}

pub fn caption_suggestions(sentiment: Sentiment, keywords: &[String]) -> Vec<String> {
    let filler = if keywords.is_empty() {
        DEFAULT_KEYWORDS.to_string()
    } else {
        keywords.join(" ")
    };
    sentiment
        .templates()
        .iter()
        .map(|template| template.replacen(KEYWORD_PLACEHOLDER, &filler, 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_sentence() {
        let result = analyze("I love this amazing trip");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.keywords, vec!["love", "amazing"]);
        assert_eq!(result.raw_score, 2);
        // 2 / 5 words * 10
        assert_eq!(result.normalized_score, 4);
        assert!(result.caption_suggestions[0].contains("love amazing"));
    }

    #[test]
    fn neutral_sentence_has_no_keywords() {
        let result = analyze("the sky is blue today");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.keywords.is_empty());
        assert_eq!(result.normalized_score, 0);
        assert!(result
            .caption_suggestions
            .iter()
            .all(|caption| caption.contains("moments like these")));
    }

    #[test]
    fn negative_sentence() {
        let result = analyze("Worst day, so SAD and angry");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.keywords, vec!["worst", "sad", "angry"]);
        assert_eq!(result.tips[0], "Try to focus on constructive feedback");
    }

    #[test]
    fn mixed_keywords_cancel_out() {
        let result = analyze("love and hate");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.keywords, vec!["love", "hate"]);
        assert_eq!(result.raw_score, 0);
    }

    #[test]
    fn score_window_caps_at_ten_words() {
        let text = "love ".repeat(15);
        let result = analyze(&text);
        assert_eq!(result.raw_score, 15);
        assert_eq!(result.normalized_score, 10);
    }

    #[test]
    fn long_text_uses_ten_word_window() {
        let text = format!("great {}", "word ".repeat(19));
        // 1 / min(20, 10) * 10
        assert_eq!(analyze(&text).normalized_score, 1);
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        let result = analyze("   ");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.normalized_score, 0);
    }

    #[test]
    fn punctuation_prevents_match() {
        assert!(analyze("love!").keywords.is_empty());
    }

    #[test]
    fn five_suggestions_per_class() {
        for sentiment in [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
            let suggestions = caption_suggestions(sentiment, &[]);
            assert_eq!(suggestions.len(), 5);
            assert!(suggestions.iter().all(|s| !s.contains(KEYWORD_PLACEHOLDER)));
        }
    }
}
