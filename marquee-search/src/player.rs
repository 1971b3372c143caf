//! Trailer discovery and player source classification.

use crate::types::Video;

/// Embed prefix for YouTube trailers.
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

pub fn youtube_embed_url(key: &str) -> String {
    format!("{YOUTUBE_EMBED_BASE}{key}")
}

/// Embed URL of the first YouTube trailer in upstream order.
pub fn find_trailer(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|video| video.is_youtube_trailer())
        .map(|video| youtube_embed_url(&video.key))
}

/// How the detail page should play a trailer source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSource {
    /// Embedded YouTube player
    YouTube { embed_url: String },
    /// Direct video file played natively
    File { src: String },
}

impl PlayerSource {
    pub fn classify(src: &str) -> Self {
        if src.contains("youtube.com") {
            PlayerSource::YouTube {
                embed_url: src.to_string(),
            }
        } else {
            PlayerSource::File {
                src: src.to_string(),
            }
        }
    }

    /// URL the player loads. Embedded players start automatically.
    pub fn playback_url(&self) -> String {
        match self {
            PlayerSource::YouTube { embed_url } => {
                let separator = if embed_url.contains('?') { '&' } else { '?' };
                format!("{embed_url}{separator}autoplay=1")
            }
            PlayerSource::File { src } => src.clone(),
        }
    }
}
