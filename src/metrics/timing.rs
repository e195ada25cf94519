use chrono::{Datelike, Local, TimeZone, Timelike};
use serde::Serialize;
use std::collections::HashMap;

use crate::Post;

pub const BEST_TIMES_LIMIT: usize = 5;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub engagement: u64,
}

impl TimeSlot {
    pub fn label(&self) -> String {
        format!("{}:00", self.hour)
    }
}

pub fn best_times(posts: &[Post]) -> Vec<TimeSlot> {
    best_times_in(posts, &Local)
}

pub fn best_times_in<Tz: TimeZone>(posts: &[Post], tz: &Tz) -> Vec<TimeSlot> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut slots: Vec<TimeSlot> = Vec::new();
    for post in posts {
        let Some(moment) = tz.timestamp_millis_opt(post.timestamp).single() else {
            continue;
        };
        let hour = moment.hour();
        let at = *index.entry(hour).or_insert_with(|| {
            slots.push(TimeSlot {
                hour,
                engagement: 0,
            });
            slots.len() - 1
        });
        let slot = &mut slots[at];
        slot.engagement = slot.engagement.saturating_add(post.engagement);
    }

    // stable: equal totals keep first-seen order
    slots.sort_by(|a, b| b.engagement.cmp(&a.engagement));
    slots.truncate(BEST_TIMES_LIMIT);
    slots
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingHeatmap {
    counts: [[u32; 24]; 7],
}

impl PostingHeatmap {
    pub fn count(&self, weekday: usize, hour: usize) -> u32 {
        self.counts
            .get(weekday)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn row(&self, weekday: usize) -> Option<&[u32; 24]> {
        self.counts.get(weekday)
    }

    pub fn max(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flat_map(|row| row.iter()).sum()
    }

    pub fn intensity(&self, weekday: usize, hour: usize) -> u32 {
        let max = self.max();
        if max == 0 {
            return 0;
        }
        (self.count(weekday, hour) as f64 / max as f64 * 10.0).round() as u32
    }
}

pub fn posting_heatmap(posts: &[Post]) -> PostingHeatmap {
    posting_heatmap_in(posts, &Local)
}

pub fn posting_heatmap_in<Tz: TimeZone>(posts: &[Post], tz: &Tz) -> PostingHeatmap {
    let mut counts = [[0u32; 24]; 7];
    for post in posts {
        if let Some(moment) = tz.timestamp_millis_opt(post.timestamp).single() {
            let day = moment.weekday().num_days_from_monday() as usize;
            counts[day][moment.hour() as usize] += 1;
        }
    }
    PostingHeatmap { counts }
}

pub fn format_hour(hour: u32) -> String {
    let period = if hour % 24 >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{}{}", display, period)
}
