// src/connection/handler.rs

//! Defines the `ConnectionHandler` which drives the client core over a real
//! TCP connection: connect/reconnect cycle, tick-paced dispatch, inbound
//! framing, and tag-event intake.

use super::backoff::ReconnectBackoff;
use crate::config::Config;
use crate::core::LmsError;
use crate::core::client::LmsClient;
use crate::core::events::{ClientEvent, TagEvent};
use crate::core::protocol::LineCodec;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, sleep};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The next step for the driver's outer loop to take.
enum NextAction {
    Reconnect,
    Shutdown,
}

/// Owns the client core and the TCP transport, reconnecting with backoff
/// until a shutdown signal arrives.
pub struct ConnectionHandler {
    client: LmsClient,
    config: Arc<Config>,
    backoff: ReconnectBackoff,
    tag_rx: mpsc::Receiver<TagEvent>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl ConnectionHandler {
    pub fn new(
        config: Arc<Config>,
        tag_rx: mpsc::Receiver<TagEvent>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let client = LmsClient::new(&config);
        let backoff = ReconnectBackoff::new(
            config.reconnect.initial_delay,
            config.reconnect.max_delay,
        );
        Self {
            client,
            config,
            backoff,
            tag_rx,
            shutdown_rx,
        }
    }

    /// The main reconnect loop. Returns once a shutdown signal is received
    /// or the tag-event source hangs up.
    pub async fn run(mut self) {
        let addr = self.config.server_addr();
        loop {
            self.client.on_connecting();
            info!("Connecting to LMS server {addr}");
            match TcpStream::connect(&addr).await {
                Ok(stream) => {
                    info!("Connected to LMS server {addr}");
                    self.backoff.reset();
                    self.client.handle(ClientEvent::Connected);
                    let action = self.drive(stream).await;
                    self.client.handle(ClientEvent::Disconnected);
                    if matches!(action, NextAction::Shutdown) {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Connection to {addr} failed: {e}");
                    self.client.handle(ClientEvent::Disconnected);
                }
            }

            let delay = self.backoff.next_delay();
            debug!("Retrying connection to {addr} in {delay:?}");
            let retry = sleep(delay);
            tokio::pin!(retry);
            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown_rx.recv() => {
                        info!("Shutdown signal received while disconnected");
                        return;
                    }
                    event = self.tag_rx.recv() => match event {
                        // The core drops tag events while disconnected.
                        Some(event) => self.apply_tag_event(event),
                        None => return,
                    },
                    _ = &mut retry => break,
                }
            }
        }
    }

    /// Multiplexes one established connection until it drops or shutdown.
    async fn drive(&mut self, stream: TcpStream) -> NextAction {
        let mut framed = Framed::new(stream, LineCodec::new(self.config.max_line_len));
        let mut tick = interval(self.config.tick_interval);
        loop {
            tokio::select! {
                // Shutdown first; then drain inbound lines completely
                // before dispatching, so response-driven enqueues are
                // ordered ahead of the tick that sends them.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Shutdown signal received, closing connection");
                    return NextAction::Shutdown;
                }
                result = framed.next() => match result {
                    Some(Ok(line)) => self.client.handle(ClientEvent::Line(line)),
                    Some(Err(e)) => {
                        if is_normal_disconnect(&e) {
                            debug!("Connection closed by peer: {e}");
                        } else {
                            warn!("Transport error: {e}");
                        }
                        return NextAction::Reconnect;
                    }
                    None => {
                        info!("Connection closed by server");
                        return NextAction::Reconnect;
                    }
                },
                event = self.tag_rx.recv() => match event {
                    Some(event) => self.apply_tag_event(event),
                    // The sensing side hung up; nothing left to report.
                    None => return NextAction::Shutdown,
                },
                _ = tick.tick() => {
                    if let Some(command) = self.client.poll_command() {
                        debug!("-> {command}");
                        if let Err(e) = framed.send(command).await {
                            warn!("Send failed: {e}");
                            return NextAction::Reconnect;
                        }
                    }
                }
            }
        }
    }

    fn apply_tag_event(&mut self, event: TagEvent) {
        match event {
            TagEvent::Present(tag_id) => self.client.send_tag(&tag_id),
            TagEvent::Removed => self.client.send_tag_removed(),
        }
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &LmsError) -> bool {
    matches!(e, LmsError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
