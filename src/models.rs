use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Substituted when a file's duration cannot be measured: 22 minutes, the
/// classic broadcast half-hour slot minus ads.
pub const FALLBACK_DURATION_SECS: f64 = 1320.0;

/// A single scanned media file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// File name without extension.
    pub name: String,
    /// Absolute filesystem path; unique identifier within the library.
    pub path: String,
    /// Last path segment of the folder the episode was scanned under.
    pub show: String,
    /// Duration in seconds, as measured by the probe.
    pub duration: f64,
}

/// A named, ordered list of media source folders played as one endless loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub folders: Vec<String>,
}

/// Folder path → scanned episodes. Replaced wholesale on every scan.
pub type Library = BTreeMap<String, Vec<Episode>>;

/// What a channel is playing right now. Derived per query, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub episode: Episode,
    pub channel_id: String,
    pub channel: String,
    /// Seconds into the current episode, in `[0, total)`.
    pub elapsed: f64,
    /// Duration of the current episode.
    pub total: f64,
    /// Seconds until the next episode starts.
    pub next_in: f64,
    pub pool_size: usize,
}

/// Display label for a source folder: its last path segment.
pub fn show_label(folder: &str) -> String {
    Path::new(folder)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.to_string())
}
