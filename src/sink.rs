use log::info;
use serde_derive::{Deserialize, Serialize};
use std::net::{SocketAddr, UdpSocket};

use crate::error::Error;

/// Clipped bounding-box centroid of one confirmed track, one frame.
/// Field names are the wire format.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRecord {
    pub id: i32,
    pub x: i32,
    pub y: i32,
}

/// Fire-and-forget UDP sink: one JSON datagram per record, no ack, no
/// retry, no batching. The socket is opened once and reused.
pub struct PositionSink {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl PositionSink {
    pub fn new(destination: &str) -> Result<Self, Error> {
        let destination: SocketAddr = destination.parse()?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        info!("streaming positions to {}", destination);

        Ok(Self {
            socket,
            destination,
        })
    }

    pub fn send(&self, record: &PositionRecord) -> Result<(), Error> {
        let payload = serde_json::to_vec(record)?;
        self.socket.send_to(&payload, self.destination)?;

        Ok(())
    }
}
