// echosounder_sim/src/simulation/core/sync.rs

//! Pairs image frames with echosounder pings by approximate timestamp.

use log::warn;

/// Anything carrying a timestamp in seconds.
pub trait Stamped {
    fn timestamp(&self) -> f64;
}

/// One image frame, together with the ping paired to it (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncedPair {
    pub frame_index: usize,
    pub ping_index: Option<usize>,
}

/// Approximate-time synchronizer.
///
/// Each frame is paired with the nearest unused ping no more than
/// `tolerance` seconds away. A ping is used at most once. Frames without a
/// ping are still reported (the tracker keeps running without sonar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTimeSync {
    pub tolerance: f64,
}

impl ApproximateTimeSync {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Both slices must be sorted by timestamp.
    pub fn pair<F: Stamped, P: Stamped>(&self, frames: &[F], pings: &[P]) -> Vec<SyncedPair> {
        let mut used = vec![false; pings.len()];
        // Index of the first ping that could still match a later frame.
        let mut start = 0;
        let mut pairs = Vec::with_capacity(frames.len());

        for (frame_index, frame) in frames.iter().enumerate() {
            let t = frame.timestamp();
            while start < pings.len() && pings[start].timestamp() < t - self.tolerance {
                start += 1;
            }

            let mut best: Option<(usize, f64)> = None;
            for (i, ping) in pings.iter().enumerate().skip(start) {
                let gap = ping.timestamp() - t;
                if gap > self.tolerance {
                    break;
                }
                if used[i] {
                    continue;
                }
                if best.map_or(true, |(_, g)| gap.abs() < g) {
                    best = Some((i, gap.abs()));
                }
            }

            if let Some((i, _)) = best {
                used[i] = true;
            }
            pairs.push(SyncedPair {
                frame_index,
                ping_index: best.map(|(i, _)| i),
            });
        }

        let dropped = used.iter().filter(|u| !**u).count();
        if dropped > 0 {
            warn!(
                "{} of {} pings could not be paired with an image within {:.3} s",
                dropped,
                pings.len(),
                self.tolerance
            );
        }
        pairs
    }
}
