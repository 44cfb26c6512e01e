//! Deterministic virtual-broadcast scheduling.
//!
//! A channel's pool loops forever and `now mod total_duration` picks a point
//! inside the loop. The scheduler is a pure function over injected snapshots
//! of the channel registry and library index: every process and every client
//! derives the same answer from the same inputs, with no playhead state and
//! no synchronization between viewers. The price is that any edit to a
//! channel or the library reshuffles the loop boundaries on the very next
//! query — accepted behavior, not a bug.

use crate::models::{Channel, Episode, FALLBACK_DURATION_SECS, Library, Schedule, show_label};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Duration used for scheduling: the measured value, or the fallback when
/// the measurement is missing, zero, negative, or not finite.
fn effective_duration(episode: &Episode) -> f64 {
    if episode.duration.is_finite() && episode.duration > 0.0 {
        episode.duration
    } else {
        FALLBACK_DURATION_SECS
    }
}

/// Flatten a channel's folders into its pool, sorted by episode path.
///
/// The byte-lexicographic sort is load-bearing: with no persisted playlist
/// index, it is the only thing that fixes the loop order across processes
/// and repeated queries. Folders missing from the library contribute
/// nothing. Each pooled episode carries the folder's label as its show name.
fn build_pool(channel: &Channel, library: &Library) -> Vec<Episode> {
    let mut pool = Vec::new();
    for folder in &channel.folders {
        let Some(episodes) = library.get(folder) else {
            continue;
        };
        let show = show_label(folder);
        for episode in episodes {
            pool.push(Episode {
                show: show.clone(),
                ..episode.clone()
            });
        }
    }
    pool.sort_by(|a, b| a.path.cmp(&b.path));
    pool
}

/// What is the given channel playing at `now`?
///
/// Returns `None` for an unknown channel, an empty pool, or a degenerate
/// total duration — callers treat all three as "nothing playing".
pub fn current_program(
    channel_id: &str,
    channels: &[Channel],
    library: &Library,
    now_epoch_secs: i64,
) -> Option<Schedule> {
    let channel = channels.iter().find(|c| c.id == channel_id)?;

    let pool = build_pool(channel, library);
    if pool.is_empty() {
        return None;
    }

    let total_duration: f64 = pool.iter().map(effective_duration).sum();
    if total_duration <= 0.0 {
        // Cannot happen given the fallback, but guarded explicitly.
        return None;
    }

    // Normalized into [0, total_duration) even for a pre-epoch clock.
    let offset = (now_epoch_secs as f64).rem_euclid(total_duration);

    let mut running_sum = 0.0;
    let mut hit = None;
    for (index, episode) in pool.iter().enumerate() {
        let duration = effective_duration(episode);
        if offset >= running_sum && offset < running_sum + duration {
            hit = Some((index, offset - running_sum));
            break;
        }
        running_sum += duration;
    }
    // Rounding can leave the offset past every interval; land on the final
    // entry rather than reporting nothing.
    let (index, elapsed) = hit.unwrap_or((pool.len() - 1, 0.0));

    let episode = pool[index].clone();
    let total = effective_duration(&episode);
    Some(Schedule {
        channel_id: channel.id.clone(),
        channel: channel.name.clone(),
        elapsed,
        total,
        next_in: total - elapsed,
        pool_size: pool.len(),
        episode,
    })
}
