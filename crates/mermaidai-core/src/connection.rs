//! Realtime connection lifecycle.
//!
//! The realtime transport is a single exclusively owned resource. The
//! [`ConnectionManager`] holds at most one live connection, tears the old one
//! down before negotiating a new one, and fetches a fresh session token for
//! every attempt. Reconnecting is a full renegotiation, never a resume.

use std::future::Future;

use mermaidai_types::error::TransportError;
use mermaidai_types::event::SessionEvent;
use mermaidai_types::realtime::{ClientEvent, ConnectionStatus, RealtimeSession};
use tokio::sync::Mutex;

use crate::event::EventBus;

/// Mints the ephemeral credential for one connection attempt.
pub trait SessionTokenSource: Send + Sync {
    fn fetch_token(&self) -> impl Future<Output = Result<RealtimeSession, TransportError>> + Send;
}

/// Negotiates realtime connections.
pub trait RealtimeTransport: Send + Sync {
    type Connection: RealtimeConnection;

    /// Acquire local media and negotiate a connection authorized by `session`.
    fn connect(
        &self,
        session: &RealtimeSession,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// One live, negotiated connection.
pub trait RealtimeConnection: Send + Sync {
    /// Send a structured event over the conversation channel.
    fn send(&self, event: &ClientEvent) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Enable or disable the outgoing audio track.
    fn set_microphone_enabled(&self, enabled: bool);

    /// Release the media capture, then the transport.
    fn close(self) -> impl Future<Output = ()> + Send;
}

struct Slot<C> {
    status: ConnectionStatus,
    connection: Option<C>,
    microphone_enabled: bool,
    /// Bumped by every connect and disconnect. A negotiation only installs
    /// its connection if no newer request arrived while it ran.
    attempt: u64,
}

/// Owns the single active connection.
///
/// The slot lock is never held across token fetch or negotiation, so status
/// queries, sends and disconnects stay responsive while an attempt runs.
pub struct ConnectionManager<K, T: RealtimeTransport> {
    tokens: K,
    transport: T,
    slot: Mutex<Slot<T::Connection>>,
    events: EventBus,
}

impl<K, T> ConnectionManager<K, T>
where
    K: SessionTokenSource,
    T: RealtimeTransport,
{
    pub fn new(tokens: K, transport: T, events: EventBus) -> Self {
        Self {
            tokens,
            transport,
            slot: Mutex::new(Slot {
                status: ConnectionStatus::Disconnected,
                connection: None,
                microphone_enabled: true,
                attempt: 0,
            }),
            events,
        }
    }

    /// Establish a new connection, replacing any existing one.
    ///
    /// The status stays `Connecting` once the transport is up; the assistant
    /// confirming its session configuration (see [`Self::mark_ready`]) moves
    /// it to `Connected`. On failure the status is left at `Disconnected` and
    /// the attempt can simply be retried. An attempt overtaken by a
    /// disconnect or a newer connect closes its connection and reports
    /// [`TransportError::Cancelled`].
    pub async fn connect(&self) -> Result<(), TransportError> {
        let attempt = {
            let mut slot = self.slot.lock().await;
            if let Some(old) = slot.connection.take() {
                old.close().await;
            }
            slot.attempt += 1;
            self.set_status(&mut slot, ConnectionStatus::Connecting);
            slot.attempt
        };

        let negotiated = async {
            let session = self.tokens.fetch_token().await?;
            tracing::debug!(model = %session.model, "Obtained realtime session token");
            self.transport.connect(&session).await
        }
        .await;

        let mut slot = self.slot.lock().await;
        if slot.attempt != attempt {
            if let Ok(connection) = negotiated {
                connection.close().await;
            }
            tracing::debug!(attempt, "Connection attempt superseded");
            return Err(TransportError::Cancelled);
        }

        match negotiated {
            Ok(connection) => {
                connection.set_microphone_enabled(true);
                slot.connection = Some(connection);
                slot.microphone_enabled = true;
                tracing::info!("Realtime connection established");
                Ok(())
            }
            Err(err) => {
                self.set_status(&mut slot, ConnectionStatus::Disconnected);
                tracing::warn!(error = %err, "Realtime connection failed");
                Err(err)
            }
        }
    }

    /// The assistant accepted the session configuration.
    ///
    /// Ignored when no connection is installed, e.g. a late event from a
    /// connection that was already torn down.
    pub async fn mark_ready(&self) {
        let mut slot = self.slot.lock().await;
        if slot.connection.is_some() {
            self.set_status(&mut slot, ConnectionStatus::Connected);
        }
    }

    /// Tear down the active connection, if any, and cancel a pending attempt.
    pub async fn disconnect(&self) {
        let mut slot = self.slot.lock().await;
        slot.attempt += 1;
        if let Some(connection) = slot.connection.take() {
            connection.close().await;
            tracing::info!("Realtime connection closed");
        }
        self.set_status(&mut slot, ConnectionStatus::Disconnected);
    }

    /// Send an event over the installed connection. Fails with
    /// `NotConnected` while an attempt is still negotiating.
    pub async fn send(&self, event: &ClientEvent) -> Result<(), TransportError> {
        let slot = self.slot.lock().await;
        match &slot.connection {
            Some(connection) => connection.send(event).await,
            None => Err(TransportError::NotConnected),
        }
    }

    /// Mute or unmute the microphone. Returns the new state.
    pub async fn toggle_microphone(&self) -> Result<bool, TransportError> {
        let mut slot = self.slot.lock().await;
        let enabled = !slot.microphone_enabled;
        let connection = slot.connection.as_ref().ok_or(TransportError::NotConnected)?;
        connection.set_microphone_enabled(enabled);
        slot.microphone_enabled = enabled;
        self.events
            .publish(SessionEvent::MicrophoneToggled { enabled });
        Ok(enabled)
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.slot.lock().await.status
    }

    fn set_status(&self, slot: &mut Slot<T::Connection>, status: ConnectionStatus) {
        if slot.status != status {
            slot.status = status;
            self.events
                .publish(SessionEvent::ConnectionStatusChanged { status });
        }
    }
}
