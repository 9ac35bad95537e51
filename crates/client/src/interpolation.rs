//! Render-side smoothing: buffers a short window of authoritative worlds,
//! keyed by local arrival time, and produces an interpolated world for
//! whatever render time the caller asks for.

use std::collections::HashMap;

use orbit_core::{Pallet, Ship, Sun, Vec2, World};

pub const DEFAULT_BUFFER_MS: f64 = 125.0;
pub const MIN_BUFFER_MS: f64 = 100.0;
pub const MAX_BUFFER_MS: f64 = 150.0;
pub const MAX_BUFFER_ENTRIES: usize = 10;

fn clamp_buffer_ms(ms: f64) -> f64 {
    ms.clamp(MIN_BUFFER_MS, MAX_BUFFER_MS)
}

#[derive(Debug, Clone)]
struct TimedWorld {
    timestamp_ms: f64,
    world: World,
}

/// A short, ordered window of `(timestamp, World)` pairs, bounded by a
/// buffer window and a hard size cap. Duplicate timestamps replace the
/// older entry; arrivals are kept sorted by timestamp.
#[derive(Debug, Clone)]
pub struct SnapshotBuffer {
    buffer_ms: f64,
    entries: Vec<TimedWorld>,
}

impl SnapshotBuffer {
    pub fn new(buffer_ms: f64) -> Self {
        Self {
            buffer_ms: clamp_buffer_ms(buffer_ms),
            entries: Vec::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(DEFAULT_BUFFER_MS)
    }

    pub fn buffer_ms(&self) -> f64 {
        self.buffer_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a world arriving at local time `timestamp_ms`. Drops entries
    /// older than the buffer window past the newest arrival, then caps the
    /// buffer at `MAX_BUFFER_ENTRIES`.
    pub fn push(&mut self, world: World, timestamp_ms: f64) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.timestamp_ms == timestamp_ms)
        {
            existing.world = world;
        } else {
            let pos = self
                .entries
                .iter()
                .position(|e| e.timestamp_ms > timestamp_ms)
                .unwrap_or(self.entries.len());
            self.entries.insert(pos, TimedWorld { timestamp_ms, world });
        }

        if let Some(newest) = self.entries.last().map(|e| e.timestamp_ms) {
            let cutoff = newest - self.buffer_ms;
            self.entries.retain(|e| e.timestamp_ms >= cutoff);
        }

        while self.entries.len() > MAX_BUFFER_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// Samples the buffer at render time `now_ms`, targeting `now_ms -
    /// buffer_ms`. `None` if nothing has arrived yet; the latest entry if
    /// only one has; otherwise the interpolation (or clamped extrapolation
    /// to the oldest/newest) between the adjacent pair straddling the
    /// target time.
    pub fn sample(&self, now_ms: f64) -> Option<World> {
        match self.entries.len() {
            0 => None,
            1 => Some(self.entries[0].world.clone()),
            len => {
                let target = now_ms - self.buffer_ms;
                if target <= self.entries[0].timestamp_ms {
                    return Some(self.entries[0].world.clone());
                }
                if target >= self.entries[len - 1].timestamp_ms {
                    return Some(self.entries[len - 1].world.clone());
                }
                for i in 0..len - 1 {
                    let a = &self.entries[i];
                    let b = &self.entries[i + 1];
                    if a.timestamp_ms <= target && target <= b.timestamp_ms {
                        let duration = b.timestamp_ms - a.timestamp_ms;
                        let alpha = if duration > 0.0 {
                            ((target - a.timestamp_ms) / duration).clamp(0.0, 1.0)
                        } else {
                            0.0
                        };
                        return Some(interpolate_world(&a.world, &b.world, alpha));
                    }
                }
                Some(self.entries[len - 1].world.clone())
            }
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_vec2(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

fn normalize_angle(rot: f64) -> f64 {
    let wrapped = rot % std::f64::consts::TAU;
    if wrapped < 0.0 { wrapped + std::f64::consts::TAU } else { wrapped }
}

/// Shortest-arc interpolation: wraps the delta into `(-pi, pi]` before
/// scaling, so crossing the 0/2pi seam never takes the long way round.
fn lerp_angle(a: f64, b: f64, t: f64) -> f64 {
    let delta = (b - a + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI;
    normalize_angle(a + delta * t)
}

fn interpolate_pallets(a: &[Pallet], b: &[Pallet], t: f64) -> Vec<Pallet> {
    let by_id: HashMap<u32, &Pallet> = a.iter().map(|p| (p.id, p)).collect();
    b.iter()
        .map(|pb| match by_id.get(&pb.id) {
            Some(pa) => Pallet {
                id: pb.id,
                pos: lerp_vec2(pa.pos, pb.pos, t),
                active: pb.active,
            },
            None => *pb,
        })
        .collect()
}

fn interpolate_world(a: &World, b: &World, t: f64) -> World {
    World {
        ship: Ship {
            pos: lerp_vec2(a.ship.pos, b.ship.pos, t),
            vel: lerp_vec2(a.ship.vel, b.ship.vel, t),
            rot: lerp_angle(a.ship.rot, b.ship.rot, t),
            energy: lerp(a.ship.energy as f64, b.ship.energy as f64, t) as f32,
        },
        sun: Sun {
            pos: lerp_vec2(a.sun.pos, b.sun.pos, t),
            radius: lerp(a.sun.radius as f64, b.sun.radius as f64, t) as f32,
            mass: b.sun.mass,
        },
        pallets: interpolate_pallets(&a.pallets, &b.pallets, t),
        tick: b.tick,
        done: b.done,
        win: b.win,
    }
}
