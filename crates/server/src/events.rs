#[derive(Debug, Clone)]
pub enum ServerEvent {
    ClientConnected { connection_id: u32 },
    ClientDisconnected { connection_id: u32, reason: DisconnectReason },
    ConnectionDenied { reason: String },
    Error { message: String },
}

#[derive(Debug, Clone, Copy)]
pub enum DisconnectReason {
    Graceful,
    Shutdown,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectReason::Graceful => "disconnected",
            DisconnectReason::Shutdown => "server shutting down",
        }
    }
}
