use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::parse_int_prefix;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Follower {
    pub username: String,
    pub last_interaction: Option<NaiveDateTime>,
    pub posts: u64,
    pub following: u64,
    pub followers: u64,
}

impl Follower {
    pub fn is_ghost(&self) -> bool {
        self.last_interaction.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GhostReport {
    pub total: usize,
    pub ghosts: usize,
    pub active: usize,
}

impl GhostReport {
    pub fn from_followers(followers: &[Follower]) -> Self {
        let ghosts = followers.iter().filter(|f| f.is_ghost()).count();
        Self {
            total: followers.len(),
            ghosts,
            active: followers.len() - ghosts,
        }
    }

    pub fn ghost_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.ghosts as f64 / self.total as f64
    }
}

pub fn parse_followers_csv(text: &str) -> Vec<Follower> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_row)
        .collect()
}

pub fn ghosts(followers: &[Follower]) -> impl Iterator<Item = &Follower> {
    followers.iter().filter(|follower| follower.is_ghost())
}

fn parse_row(line: &str) -> Follower {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    let cell = |idx: usize| cells.get(idx).copied().unwrap_or("");

    Follower {
        username: cell(0).to_string(),
        last_interaction: parse_interaction(cell(1)),
        posts: parse_int_prefix(cell(2)),
        following: parse_int_prefix(cell(3)),
        followers: parse_int_prefix(cell(4)),
    }
}

fn parse_interaction(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(value, format) {
            return Some(moment);
        }
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
