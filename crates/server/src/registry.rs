//! The glue: maps a connection identity to its session task, routes inbound
//! frames to it, and tears it down on disconnect. The registry itself is
//! only ever touched from the supervisor task — no lock is needed.

use std::collections::HashMap;

use orbit_core::scheduler::{Inbound, SessionConfig, WorldTemplate, run_session};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{DisconnectReason, ServerEvent};

pub struct SessionHandle {
    pub inbound: mpsc::Sender<Inbound>,
    shutdown: CancellationToken,
    join: JoinHandle<()>,
}

/// Registry of connection-id → session, owned exclusively by the supervisor.
pub struct SessionRegistry {
    sessions: HashMap<u32, SessionHandle>,
    next_id: u32,
    max_clients: usize,
}

impl SessionRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 1,
            max_clients,
        }
    }

    /// Spawns a new session task bound to `template`/`config`, wired to
    /// `outbound`. Returns its connection id, or `None` if the registry is
    /// already at `max_clients`.
    pub fn spawn(
        &mut self,
        template: WorldTemplate,
        config: SessionConfig,
        outbound: mpsc::Sender<String>,
    ) -> Option<(u32, ServerEvent)> {
        if self.sessions.len() >= self.max_clients {
            return None;
        }

        let connection_id = self.next_id;
        self.next_id += 1;

        let (inbound_tx, inbound_rx) = mpsc::channel(32);
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(run_session(
            template,
            config,
            inbound_rx,
            outbound,
            shutdown.clone(),
        ));

        self.sessions.insert(
            connection_id,
            SessionHandle {
                inbound: inbound_tx,
                shutdown,
                join,
            },
        );

        Some((connection_id, ServerEvent::ClientConnected { connection_id }))
    }

    pub fn route(&self, connection_id: u32, message: Inbound) -> bool {
        match self.sessions.get(&connection_id) {
            Some(handle) => handle.inbound.try_send(message).is_ok(),
            None => false,
        }
    }

    /// Cancels the session's task and drops its handle. The join is not
    /// awaited here — callers that need to observe termination should await
    /// `take_join` themselves (used by graceful shutdown).
    pub fn disconnect(&mut self, connection_id: u32, reason: DisconnectReason) -> Option<ServerEvent> {
        let handle = self.sessions.remove(&connection_id)?;
        handle.shutdown.cancel();
        Some(ServerEvent::ClientDisconnected {
            connection_id,
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Cancels every session and returns their join handles so the caller can
    /// await them under the shutdown budget (§5: 5 seconds).
    pub fn shutdown_all(&mut self) -> Vec<JoinHandle<()>> {
        let mut joins = Vec::with_capacity(self.sessions.len());
        for (_, handle) in self.sessions.drain() {
            handle.shutdown.cancel();
            joins.push(handle.join);
        }
        joins
    }
}
