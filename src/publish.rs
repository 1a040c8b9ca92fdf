//! MQTT publishing of finished drawings
//!
//! Connects to an MQTT broker and publishes the grid snapshot as JSON, typically
//! once per completed stroke, for a downstream classifier to pick up.

use crate::error::{PadError, Result};
use crate::export::PixelSnapshot;
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "pixelpad/snapshot";

/// Publishes snapshots; the connection is driven on a background thread
pub struct SnapshotPublisher {
    client: Client,
    topic: String,
    _thread: thread::JoinHandle<()>,
}

impl SnapshotPublisher {
    /// Connect to the broker.
    /// Fails immediately if the connection cannot be established.
    pub fn new(host: &str, port: u16, topic: &str) -> Result<Self> {
        let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };
        if topic.contains(['+', '#']) {
            return Err(PadError::Publish(format!(
                "cannot publish to wildcard topic '{}'",
                topic
            )));
        }

        let mut options = MqttOptions::new("pixelpad", host, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);

        // Poll once so an unreachable broker fails fast
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => {
                return Err(PadError::Publish(format!(
                    "failed to connect to MQTT broker at {}:{} - {}",
                    host, port, e
                )));
            },
            None => {
                return Err(PadError::Publish(format!(
                    "failed to connect to MQTT broker at {}:{} - connection closed",
                    host, port
                )));
            },
        }

        let handle = thread::spawn(move || Self::event_loop(connection));

        info!(host, port, topic, "MQTT publisher connected");

        Ok(Self {
            client,
            topic: topic.to_string(),
            _thread: handle,
        })
    }

    fn event_loop(mut connection: Connection) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    debug!(code = ?ack.code, "MQTT session established");
                },
                Ok(_) => {},
                Err(e) => {
                    // Keep polling; rumqttc reconnects on the next iteration
                    warn!(error = %e, "MQTT connection error");
                    thread::sleep(Duration::from_secs(1));
                },
            }
        }
    }

    /// Queue a snapshot for delivery without blocking the caller
    pub fn publish(&self, snapshot: &PixelSnapshot) -> Result<()> {
        let payload = snapshot.to_json()?;
        self.client
            .try_publish(self.topic.as_str(), QoS::AtLeastOnce, false, payload)
            .map_err(|e| PadError::Publish(e.to_string()))?;
        debug!(topic = %self.topic, cells = snapshot.values.len(), "snapshot queued");
        Ok(())
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}
