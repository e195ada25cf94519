use serde::Serialize;

use crate::{MediaType, Post};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentMix {
    pub image: usize,
    pub video: usize,
}

impl ContentMix {
    pub fn entries(&self) -> Vec<(MediaType, usize)> {
        [(MediaType::Image, self.image), (MediaType::Video, self.video)]
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.image + self.video
    }
}

pub fn content_mix(posts: &[Post]) -> ContentMix {
    posts.iter().fold(ContentMix::default(), |mut mix, post| {
        match post.media_type() {
            MediaType::Video => mix.video += 1,
            _ => mix.image += 1,
        }
        mix
    })
}
