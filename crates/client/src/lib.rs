//! The client-side mirror of the session core: local prediction, threshold
//! gated reconciliation against authoritative snapshots, and a render-time
//! interpolation buffer. Rendering, input capture, and transport are out of
//! scope here — this crate is the logic a real client embeds.

pub mod interpolation;
pub mod prediction;

pub use interpolation::{
    DEFAULT_BUFFER_MS, MAX_BUFFER_ENTRIES, MAX_BUFFER_MS, MIN_BUFFER_MS, SnapshotBuffer,
};
pub use prediction::{
    ClientPrediction, CommandHistory, ENERGY_THRESHOLD, HistoryEntry, POSITION_THRESHOLD,
    ROTATION_THRESHOLD,
};
