//! Thin wrappers around the `metrics` crate's recorder facade for the named
//! series in the external-interfaces contract. The core never installs a
//! recorder itself — wiring one up (Prometheus exposition or otherwise) is
//! the host process's job.

pub fn record_connection_event(event: &'static str) {
    metrics::counter!("connection_events_total", "event" => event).increment(1);
}

pub fn record_message(direction: &'static str) {
    metrics::counter!("messages_total", "direction" => direction).increment(1);
}

pub fn set_active_connections(count: f64) {
    metrics::gauge!("active_connections").set(count);
}

pub fn set_queue_depth(depth: f64) {
    metrics::gauge!("queue_depth").set(depth);
}

pub fn observe_tick_duration(seconds: f64) {
    metrics::histogram!("tick_duration_seconds").record(seconds);
}

pub fn observe_gc_pause(seconds: f64) {
    metrics::histogram!("gc_pause_seconds").record(seconds);
}

/// A dropped snapshot (outbound sink blocked for the tick, §7) is counted
/// against the `error` event label — the contract names the series and the
/// label set but doesn't coin a separate name for this case, and "a delivery
/// failure occurred" is exactly what `event="error"` already means.
pub fn record_dropped_snapshot() {
    record_connection_event("error");
}

/// A stale, duplicate, or queue-full `enqueue` rejection (§7) — like a
/// dropped snapshot, the contract names no series of its own for this, so
/// it's counted against the same `error` event label.
pub fn record_queue_reject() {
    record_connection_event("error");
}
