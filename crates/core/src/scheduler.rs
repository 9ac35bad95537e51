//! The per-session fixed-rate scheduler: one `tokio::task` per connected
//! player, draining its `CommandQueue` and stepping the kernel 30 times a
//! second.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::kernel::{A_MAX, G, InputCommand, PICKUP_RADIUS, Pallet, Ship, Sun, TICK_RATE, World, step};
use crate::metrics;
use crate::protocol::{Message, SnapshotMessage, encode};
use crate::queue::CommandQueue;

/// Accumulator-based fixed timestep: wakeups need not land exactly on `dt`
/// boundaries, and a scheduling hiccup is absorbed by running more than one
/// tick on the next wakeup rather than drifting the tick count from wall
/// time. The accumulator is capped per `accumulate` call so a long stall
/// (e.g. the process being suspended) cannot cause an unbounded catch-up
/// burst.
pub struct FixedTimestep {
    dt: f64,
    accumulator: f64,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate as f64,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f64) {
        self.accumulator += delta.min(0.25);
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// The fixed ship/sun/pallet layout a session starts (and restarts) from.
#[derive(Debug, Clone)]
pub struct WorldTemplate {
    pub ship: Ship,
    pub sun: Sun,
    pub pallets: Vec<Pallet>,
}

impl WorldTemplate {
    pub fn instantiate(&self) -> World {
        World::new(self.ship, self.sun, self.pallets.clone())
    }
}

/// What the sibling inbound-decoder task hands to the session. The decoder
/// never calls into the kernel itself — only this task does.
#[derive(Debug, Clone, Copy)]
pub enum Inbound {
    Input { seq: u32, command: InputCommand },
    Restart,
}

pub struct SessionConfig {
    pub tick_rate: u32,
    pub queue_max_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            queue_max_size: 16,
        }
    }
}

/// Runs one session to completion: until `shutdown` is cancelled or
/// `inbound` closes. `outbound` is a bounded sink; a snapshot that can't be
/// sent within the tick it was produced is dropped, counted, and superseded
/// by the next tick's snapshot — the session never blocks on it.
pub async fn run_session(
    template: WorldTemplate,
    config: SessionConfig,
    mut inbound: mpsc::Receiver<Inbound>,
    outbound: mpsc::Sender<String>,
    shutdown: CancellationToken,
) {
    let mut world = template.instantiate();
    let mut queue = CommandQueue::new(config.queue_max_size);
    let mut timestep = FixedTimestep::new(config.tick_rate);
    let dt = timestep.dt();

    let mut interval = tokio::time::interval(Duration::from_secs_f64(dt));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_wake = Instant::now();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                log::debug!("session shutting down: cancellation requested");
                break;
            }
            _ = interval.tick() => {
                let now = Instant::now();
                timestep.accumulate(now.duration_since(last_wake).as_secs_f64());
                last_wake = now;

                let mut ack_seq = None;
                let mut ticked = false;
                while timestep.consume_tick() {
                    let tick_start = Instant::now();
                    let dequeued = queue.dequeue();
                    let command = match dequeued {
                        Some(q) => {
                            ack_seq = Some(q.sequence);
                            q.command
                        }
                        None => {
                            ack_seq = None;
                            InputCommand::NEUTRAL
                        }
                    };
                    world = step(world, command, dt, G, A_MAX, PICKUP_RADIUS);
                    metrics::observe_tick_duration(tick_start.elapsed().as_secs_f64());
                    metrics::set_queue_depth(queue.size() as f64);
                    ticked = true;
                }

                if ticked {
                    let snapshot = SnapshotMessage::from_world(&world, ack_seq);
                    match encode(&Message::Snapshot(snapshot)) {
                        Ok(frame) => {
                            if outbound.try_send(frame).is_ok() {
                                metrics::record_message("out");
                            } else {
                                metrics::record_dropped_snapshot();
                            }
                        }
                        Err(_) => metrics::record_dropped_snapshot(),
                    }
                }
            }
            received = inbound.recv() => {
                match received {
                    Some(Inbound::Input { seq, command }) => {
                        if !queue.enqueue(seq, command) {
                            log::warn!("dropping input seq={seq}: stale, duplicate, or queue full");
                            metrics::record_queue_reject();
                        }
                    }
                    Some(Inbound::Restart) => {
                        log::debug!("session restarting");
                        world = template.instantiate();
                        queue.clear();
                        timestep.reset();
                    }
                    None => {
                        log::debug!("session shutting down: inbound channel closed");
                        break;
                    }
                }
            }
        }
    }
}
