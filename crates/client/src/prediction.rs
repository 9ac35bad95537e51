//! Client-side mirror of the kernel: a `predicted` state chained ahead of
//! the last acknowledged snapshot, reconciled by replaying unconfirmed
//! input whenever the server's view diverges from what was predicted.

use orbit_core::{A_MAX, DT, G, InputCommand, PICKUP_RADIUS, World, step};

/// Position/velocity divergence beyond this many units triggers a replay.
/// No separate velocity threshold is given; velocity shares the position
/// bound since both are measured in the same spatial units.
pub const POSITION_THRESHOLD: f64 = 5.0;
pub const ROTATION_THRESHOLD: f64 = 0.1;
pub const ENERGY_THRESHOLD: f32 = 1.0;

/// One unconfirmed input: its sequence, the command applied, and the world
/// it was applied to. Retained until the server confirms `seq`.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub seq: u32,
    pub command: InputCommand,
    pub base: World,
}

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<HistoryEntry>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, seq: u32, command: InputCommand, base: World) {
        self.entries.push(HistoryEntry { seq, command, base });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, seq: u32) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.seq == seq)
    }

    /// Entries strictly newer than `ack`, in sequence order.
    pub fn after(&self, ack: u32) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.seq > ack)
    }

    /// Drops entries with `seq <= ack` — the server has confirmed them.
    pub fn discard_through(&mut self, ack: u32) {
        self.entries.retain(|e| e.seq > ack);
    }
}

fn angle_diff(a: f64, b: f64) -> f64 {
    let wrapped = (a - b + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI;
    wrapped.abs()
}

fn diverges(predicted: &World, authoritative: &World) -> bool {
    let pos_diff = predicted.ship.pos.sub(authoritative.ship.pos).length();
    let vel_diff = predicted.ship.vel.sub(authoritative.ship.vel).length();
    let rot_diff = angle_diff(predicted.ship.rot, authoritative.ship.rot);
    let energy_diff = (predicted.ship.energy - authoritative.ship.energy).abs();

    pos_diff > POSITION_THRESHOLD
        || vel_diff > POSITION_THRESHOLD
        || rot_diff > ROTATION_THRESHOLD
        || energy_diff > ENERGY_THRESHOLD
}

/// The three-layer client state: `authoritative` (last accepted snapshot),
/// `predicted` (chained local simulation ahead of it), and the unconfirmed
/// input `history` used to replay after reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ClientPrediction {
    authoritative: Option<World>,
    predicted: Option<World>,
    history: CommandHistory,
}

impl ClientPrediction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authoritative(&self) -> Option<&World> {
        self.authoritative.as_ref()
    }

    pub fn predicted(&self) -> Option<&World> {
        self.predicted.as_ref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Render consumers prefer `predicted`, then `authoritative`, then
    /// nothing (no snapshot has arrived yet).
    pub fn render_state(&self) -> Option<&World> {
        self.predicted.as_ref().or(self.authoritative.as_ref())
    }

    /// Applies one local input: steps from `predicted` if present, else from
    /// `authoritative`. A no-op if neither is available yet (no snapshot has
    /// ever arrived to seed the chain). Records `(seq, command, base)` in
    /// history before stepping, so reconciliation can replay it later.
    pub fn predict(&mut self, seq: u32, command: InputCommand) {
        let Some(base) = self.predicted.clone().or_else(|| self.authoritative.clone()) else {
            return;
        };
        self.history.push(seq, command, base.clone());
        self.predicted = Some(step(base, command, DT, G, A_MAX, PICKUP_RADIUS));
    }

    /// Derives the acknowledged sequence when the snapshot didn't carry one
    /// explicitly: the history entry whose base tick is one less than the
    /// snapshot's tick.
    fn derive_ack(&self, snapshot: &World) -> u32 {
        self.history
            .entries
            .iter()
            .find(|e| e.base.tick + 1 == snapshot.tick)
            .map(|e| e.seq)
            .unwrap_or(0)
    }

    /// Applies a received snapshot. Updates `authoritative` unconditionally,
    /// then compares it against the replay of the acknowledged history entry.
    /// On mismatch, replays every entry newer than the ack atop the fresh
    /// authoritative state; otherwise leaves `predicted` untouched and simply
    /// discards the now-confirmed history.
    pub fn reconcile(&mut self, snapshot: World, ack_seq: Option<u32>) {
        let ack = ack_seq.unwrap_or_else(|| self.derive_ack(&snapshot));

        let mismatch = match self.history.find(ack) {
            Some(entry) => {
                let replayed = step(entry.base.clone(), entry.command, DT, G, A_MAX, PICKUP_RADIUS);
                diverges(&replayed, &snapshot)
            }
            None => false,
        };

        if mismatch {
            let mut current = snapshot.clone();
            for entry in self.history.after(ack) {
                current = step(current, entry.command, DT, G, A_MAX, PICKUP_RADIUS);
            }
            self.predicted = Some(current);
        }

        self.authoritative = Some(snapshot);
        self.history.discard_through(ack);
    }

    pub fn reset(&mut self) {
        self.authoritative = None;
        self.predicted = None;
        self.history = CommandHistory::new();
    }
}
