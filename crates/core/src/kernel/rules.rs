//! The rules kernel: clamping, rotation/thrust, energy accounting, win/lose,
//! and the `step` pipeline that chains the physics kernel through one tick.
//! Like `physics`, nothing here fails — `step` is total over its precondition
//! that `input`'s fields are finite (guaranteed by the decoder upstream).

use serde::{Deserialize, Serialize};

use super::physics::{gravity_accel, semi_implicit_euler, ship_pallet_hit, ship_sun_hit};
use super::vec2::Vec2;
use super::world::{MAX_ENERGY, Ship, World};

pub const G: f64 = 1.0;
pub const A_MAX: f64 = 100.0;
pub const PICKUP_RADIUS: f64 = 1.2;
pub const TICK_RATE: u32 = 30;
pub const DT: f64 = 1.0 / TICK_RATE as f64;

const TURN_RATE: f64 = 3.0;
const THRUST_ACCEL: f64 = 20.0;
const THRUST_DRAIN: f32 = 0.5;
const PALLET_RESTORE: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputCommand {
    pub thrust: f32,
    pub turn: f32,
}

impl InputCommand {
    pub const NEUTRAL: InputCommand = InputCommand {
        thrust: 0.0,
        turn: 0.0,
    };

    pub fn new(thrust: f32, turn: f32) -> Self {
        Self { thrust, turn }
    }

    /// `thrust` into `[0,1]`, `turn` into `[-1,1]`. Out-of-range values are
    /// clamped, never rejected.
    pub fn clamp(self) -> InputCommand {
        InputCommand {
            thrust: self.thrust.clamp(0.0, 1.0),
            turn: self.turn.clamp(-1.0, 1.0),
        }
    }
}

/// Wraps `rot` into `[0, 2*PI)` via modulo with a positive adjustment.
fn normalize_angle(rot: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let wrapped = rot % two_pi;
    if wrapped < 0.0 { wrapped + two_pi } else { wrapped }
}

/// Rotation update, thrust application, and energy gating — everything the
/// rules kernel does to the ship before gravity/integration run. `pos` passes
/// through unchanged; only the integrator (in `physics`) moves the ship.
pub fn apply_input(ship: Ship, input: InputCommand, dt: f64) -> Ship {
    let input = input.clamp();

    let rot_new = normalize_angle(ship.rot + TURN_RATE * input.turn as f64 * dt);

    let wants_thrust = ship.energy > 0.0 && input.thrust > 0.0;
    let (vel, energy) = if wants_thrust {
        let dir = Vec2::new(rot_new.cos(), rot_new.sin());
        let thrust_vel = dir.scale(THRUST_ACCEL * input.thrust as f64 * dt);
        (
            ship.vel.add(thrust_vel),
            (ship.energy - THRUST_DRAIN).max(0.0),
        )
    } else {
        (ship.vel, ship.energy)
    };

    Ship {
        pos: ship.pos,
        vel,
        rot: rot_new,
        energy,
    }
}

fn restore_energy(energy: f32) -> f32 {
    (energy + PALLET_RESTORE).min(MAX_ENERGY)
}

fn win_predicate(world: &World) -> bool {
    !world.pallets.is_empty() && world.pallets.iter().all(|p| !p.active)
}

fn lose_predicate(world: &World) -> bool {
    ship_sun_hit(world.ship.pos, world.sun.pos, world.sun.radius)
}

/// Idempotent on a terminal world: once `done`, further calls are no-ops.
/// Win is evaluated strictly before lose, so a world that satisfies both in
/// the same tick is recorded as a win.
pub fn evaluate_game_state(mut world: World) -> World {
    if world.done {
        return world;
    }
    if win_predicate(&world) {
        world.done = true;
        world.win = true;
    } else if lose_predicate(&world) {
        world.done = true;
        world.win = false;
    }
    world
}

/// Advances `world` by exactly one tick. If the world is already `done`, only
/// `tick` advances and nothing else is touched — the contract in §8 requires
/// `step(W).ship == W.ship` for a done world.
pub fn step(world: World, input: InputCommand, dt: f64, g: f64, a_max: f64, pickup_radius: f64) -> World {
    if world.done {
        return World {
            tick: world.tick + 1,
            ..world
        };
    }

    let ship = apply_input(world.ship, input, dt);
    let accel = gravity_accel(ship.pos, world.sun.pos, world.sun.mass, g, a_max);
    let (pos, vel) = semi_implicit_euler(ship.pos, ship.vel, accel, dt);
    let ship = Ship { pos, vel, ..ship };

    let mut pallets = world.pallets;
    let mut energy = ship.energy;
    for pallet in pallets.iter_mut() {
        if pallet.active && ship_pallet_hit(ship.pos, pallet.pos, pickup_radius) {
            pallet.active = false;
            energy = restore_energy(energy);
        }
    }
    let ship = Ship { energy, ..ship };

    let world = World {
        ship,
        pallets,
        tick: world.tick,
        ..world
    };
    let mut world = evaluate_game_state(world);
    world.tick += 1;
    world
}
