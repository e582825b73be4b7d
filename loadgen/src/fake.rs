use std::sync::{Arc, Mutex};

use anyhow::bail;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::link::Link;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Publish { topic: String, qos: QoS, payload: String },
    Subscribe { topic: String, qos: QoS },
}

/// In-memory link that records every request it is handed.
#[derive(Clone, Default)]
pub struct RecordingLink {
    calls: Arc<Mutex<Vec<Call>>>,
    refuse: bool,
}

impl RecordingLink {
    /// A link whose requests all fail, like a client whose event loop is gone.
    pub fn refusing() -> Self {
        RecordingLink {
            refuse: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Publish { payload, .. } => Some(payload),
                Call::Subscribe { .. } => None,
            })
            .collect()
    }
}

impl Link for RecordingLink {
    async fn publish(&self, topic: &str, qos: QoS, payload: String) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Call::Publish {
            topic: topic.to_string(),
            qos,
            payload,
        });
        if self.refuse {
            bail!("request channel closed");
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Call::Subscribe {
            topic: topic.to_string(),
            qos,
        });
        if self.refuse {
            bail!("request channel closed");
        }
        Ok(())
    }
}

/// A listener standing in for the broker, plus a client aimed at it. The
/// client handle has to outlive the test or the event loop sees its request
/// queue close.
pub async fn broker() -> (TcpListener, AsyncClient, EventLoop) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (client, eventloop) =
        AsyncClient::new(MqttOptions::new("loadgen-test", "127.0.0.1", port), 10);
    (listener, client, eventloop)
}

/// Accepts one connection, reads its CONNECT and answers with `code`.
pub async fn accept_and_ack(listener: &TcpListener, code: u8) -> TcpStream {
    let (mut socket, _) = listener.accept().await.unwrap();
    expect_packet(&mut socket, 1).await;
    socket.write_all(&[0x20, 0x02, 0x00, code]).await.unwrap();
    socket
}

/// Reads from the socket and checks the control packet type of what arrived.
pub async fn expect_packet(socket: &mut TcpStream, packet_type: u8) {
    let mut buf = [0; 256];
    let n = socket.read(&mut buf).await.unwrap();
    assert!(n > 0, "connection closed early");
    assert_eq!(buf[0] >> 4, packet_type);
}
