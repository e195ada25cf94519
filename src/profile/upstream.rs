use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{parse_int_prefix, HashtagInsight, LocationShare, PostingTime};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamProfile {
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub followers_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub following_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub media_count: u64,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_private: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_pic_url: Option<String>,
    #[serde(deserialize_with = "lenient_posts")]
    pub recent_posts: Vec<UpstreamPost>,
    #[serde(deserialize_with = "lenient")]
    pub demographics: Option<UpstreamDemographics>,
    #[serde(deserialize_with = "lenient")]
    pub insights: Option<UpstreamInsights>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamPost {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub caption: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub video_url: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub likes_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub comments_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub shares_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub saves_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub reach_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub impressions_count: u64,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_video: bool,
    pub timestamp: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamDemographics {
    #[serde(deserialize_with = "lenient")]
    pub age_ranges: Option<BTreeMap<String, f64>>,
    #[serde(deserialize_with = "lenient")]
    pub gender: Option<BTreeMap<String, f64>>,
    #[serde(deserialize_with = "lenient")]
    pub top_locations: Option<Vec<LocationShare>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamInsights {
    #[serde(deserialize_with = "lenient_f64")]
    pub reach_growth: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub impressions_growth: f64,
    #[serde(deserialize_with = "lenient")]
    pub top_hashtags: Vec<HashtagInsight>,
    #[serde(deserialize_with = "lenient")]
    pub best_times: Vec<PostingTime>,
}

pub fn parse_upstream(payload: &Value) -> Result<UpstreamProfile, String> {
    if !payload.is_object() {
        return Err(format!(
            "upstream payload is not an object ({})",
            value_kind(payload)
        ));
    }
    UpstreamProfile::deserialize(payload)
        .map_err(|err| format!("upstream payload rejected: {}", err))
}

pub fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64)),
        Value::String(text) => parse_timestamp_text(text),
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(moment) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(moment.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis());
    }
    trimmed.parse::<i64>().ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_u64().unwrap_or_else(|| {
            number
                .as_f64()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v.trunc() as u64)
                .unwrap_or(0)
        }),
        Value::String(text) => parse_int_prefix(&text),
        _ => 0,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()).unwrap_or(0.0))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number
            .as_f64()
            .map(|v| v != 0.0 && !v.is_nan())
            .unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.is_empty() => Some(text),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_posts<'de, D>(deserializer: D) -> Result<Vec<UpstreamPost>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
