use orbit_core::TICK_RATE;

pub const DEFAULT_PORT: u16 = 8080;

/// Matches `orbit_client`'s own default interpolation buffer window.
pub const DEFAULT_SNAPSHOT_BUFFER_CAPACITY_MS: u32 = 125;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Fixed at `orbit_core::TICK_RATE` (30 Hz) — not a configurable field;
    /// variable tick rates are a non-goal.
    pub tick_rate: u32,
    pub port: u16,
    pub max_clients: usize,
    pub queue_max_size: usize,
    /// The interpolation buffer window this server recommends its clients
    /// use (§4.8). The server doesn't buffer snapshots itself — this value
    /// is advertised, not enforced here.
    pub snapshot_buffer_capacity_ms: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            port: DEFAULT_PORT,
            max_clients: 32,
            queue_max_size: 16,
            snapshot_buffer_capacity_ms: DEFAULT_SNAPSHOT_BUFFER_CAPACITY_MS,
        }
    }
}

impl ServerConfig {
    /// Applies the `PORT` environment variable over the default, per the
    /// external-interfaces contract. An unparseable value is ignored, not a
    /// startup failure.
    pub fn with_port_env(mut self) -> Self {
        if let Ok(raw) = std::env::var("PORT") {
            if let Ok(port) = raw.parse() {
                self.port = port;
            }
        }
        self
    }
}
