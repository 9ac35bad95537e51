pub mod kernel;
pub mod metrics;
pub mod protocol;
pub mod queue;
pub mod scheduler;

pub use kernel::{
    A_MAX, DT, G, InputCommand, MAX_ENERGY, PICKUP_RADIUS, Pallet, Ship, Sun, TICK_RATE, Vec2,
    World, apply_input, evaluate_game_state, gravity_accel, semi_implicit_euler, ship_pallet_hit,
    ship_sun_hit, step,
};
pub use protocol::{InputMessage, Message, ProtocolError, RestartMessage, SnapshotMessage, decode, encode};
pub use queue::{CommandQueue, QueuedCommand};
pub use scheduler::{FixedTimestep, Inbound, SessionConfig, WorldTemplate, run_session};
