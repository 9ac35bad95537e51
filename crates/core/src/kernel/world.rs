use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Ship energy never leaves this range.
pub const MAX_ENERGY: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f64,
    pub energy: f32,
}

impl Ship {
    pub fn new(pos: Vec2, vel: Vec2, rot: f64, energy: f32) -> Self {
        Self {
            pos,
            vel,
            rot,
            energy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub pos: Vec2,
    pub radius: f32,
    pub mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
}

/// Exactly one ship, one sun, an ordered list of pallets. `step` is the only
/// thing allowed to mutate one of these once a session owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub ship: Ship,
    pub sun: Sun,
    pub pallets: Vec<Pallet>,
    pub tick: u32,
    pub done: bool,
    pub win: bool,
}

impl World {
    pub fn new(ship: Ship, sun: Sun, pallets: Vec<Pallet>) -> Self {
        Self {
            ship,
            sun,
            pallets,
            tick: 0,
            done: false,
            win: false,
        }
    }

    /// Resets to a fresh start: a given ship/sun/pallet layout, all pallets
    /// active, `tick = 0`, `done = false`. Used by the scheduler's restart
    /// handling (§4.4) — the pallet `active` flags passed in are reset to
    /// `true` regardless of their input value.
    pub fn restart(ship: Ship, sun: Sun, mut pallets: Vec<Pallet>) -> Self {
        for p in &mut pallets {
            p.active = true;
        }
        Self::new(ship, sun, pallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_world() -> World {
        World::new(
            Ship::new(Vec2::new(10.0, 0.0), Vec2::new(-1.0, 0.0), 0.0, 100.0),
            Sun {
                pos: Vec2::ZERO,
                radius: 50.0,
                mass: 1000.0,
            },
            vec![Pallet {
                id: 1,
                pos: Vec2::new(0.5, 0.0),
                active: true,
            }],
        )
    }

    #[test]
    fn restart_reactivates_pallets() {
        let mut world = sample_world();
        world.pallets[0].active = false;
        world.tick = 42;
        world.done = true;

        let restarted = World::restart(world.ship, world.sun, world.pallets.clone());
        assert!(restarted.pallets[0].active);
        assert_eq!(restarted.tick, 0);
        assert!(!restarted.done);
    }
}
