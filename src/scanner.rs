//! Media library scanner.
//!
//! Walks each source folder for video files and measures durations with
//! ffprobe. Probing is the slow part, so durations already in the library
//! are reused by path; a file whose duration cannot be measured gets the
//! fallback constant rather than failing the scan. The scan output replaces
//! the library document wholesale — only the folders passed in appear in
//! the new document.

use crate::config::Config;
use crate::models::{Episode, FALLBACK_DURATION_SECS, Library, show_label};
use crate::store::Store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "webm"];

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect video files under `dir`, recursively. Unreadable entries are
/// skipped, not errors.
fn collect_video_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_video_files(&path, out);
        } else if is_video_file(&path) {
            out.push(path);
        }
    }
}

/// Path → previously measured duration, for O(1) reuse across re-scans.
fn known_durations(library: &Library) -> HashMap<String, f64> {
    let mut map = HashMap::new();
    for episodes in library.values() {
        for episode in episodes {
            if episode.duration.is_finite() && episode.duration > 0.0 {
                map.insert(episode.path.clone(), episode.duration);
            }
        }
    }
    map
}

/// Measure a file's duration in seconds with ffprobe.
///
/// Any failure — spawn error, non-zero exit, unparsable output, timeout —
/// yields `None`; the caller substitutes the fallback duration. A wrong
/// duration only skews scheduling slightly, so probing never aborts a scan.
pub async fn probe_duration(config: &Config, path: &Path) -> Option<f64> {
    let probe = Command::new(&config.ffprobe_path)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        // A timeout drops the output future; the drop must kill the child
        // too, or every hung probe leaves an ffprobe process behind.
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(Duration::from_secs(config.probe_timeout_secs), probe)
        .await
    {
        Ok(Ok(output)) if output.status.success() => output,
        Ok(Ok(output)) => {
            warn!("ffprobe exited with {} for {}", output.status, path.display());
            return None;
        }
        Ok(Err(e)) => {
            warn!("Failed to run ffprobe for {}: {}", path.display(), e);
            return None;
        }
        Err(_) => {
            warn!(
                "ffprobe timed out after {}s for {}",
                config.probe_timeout_secs,
                path.display()
            );
            return None;
        }
    };

    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Re-scan `folders` and replace the library document.
///
/// Folders that do not exist contribute no entry — not an error.
pub async fn full_scan(config: &Config, store: &Store, folders: &[String]) {
    let known = known_durations(&store.read_library().await);
    let mut library = Library::new();

    for folder in folders {
        // The recursive walk is synchronous fs work; keep it off the
        // runtime workers.
        let root = PathBuf::from(folder);
        let files = tokio::task::spawn_blocking(move || {
            if !root.is_dir() {
                return None;
            }
            let mut files = Vec::new();
            collect_video_files(&root, &mut files);
            files.sort();
            Some(files)
        })
        .await
        .ok()
        .flatten();
        let Some(files) = files else {
            continue;
        };
        info!("Scanning {}", folder);

        let show = show_label(folder);
        let mut episodes = Vec::with_capacity(files.len());
        for file in files {
            let path = file.to_string_lossy().into_owned();
            let duration = match known.get(&path) {
                Some(d) => *d,
                None => {
                    info!("Probing duration for {}", path);
                    probe_duration(config, &file)
                        .await
                        .unwrap_or(FALLBACK_DURATION_SECS)
                }
            };
            episodes.push(Episode {
                name: file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path,
                show: show.clone(),
                duration,
            });
        }

        info!("Indexed {} episode(s) under {}", episodes.len(), folder);
        library.insert(folder.clone(), episodes);
    }

    if let Err(e) = store.write_library(&library).await {
        warn!("Failed to write library: {}", e);
    }
}
