mod physics;
mod rules;
mod vec2;
mod world;

pub use physics::{gravity_accel, semi_implicit_euler, ship_pallet_hit, ship_sun_hit};
pub use rules::{
    A_MAX, DT, G, InputCommand, PICKUP_RADIUS, TICK_RATE, apply_input, evaluate_game_state, step,
};
pub use vec2::Vec2;
pub use world::{MAX_ENERGY, Pallet, Ship, Sun, World};
