//! Receive loop for the `subscribe` client.

use std::{fmt, future::Future, io::Write};

use rumqttc::{ConnectReturnCode, QoS};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    endpoint::{BROKER_HOST, BROKER_PORT},
    link::Link,
    notice::{return_code, Notice},
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `shutdown` resolved.
    Interrupted,
    /// The pump stopped, so no more notices will arrive.
    LinkClosed,
}

/// Handles notices in arrival order until shutdown or until the pump stops.
///
/// The subscription is only requested after a successful CONNACK, and again
/// after every successful reconnect since sessions start clean.
pub async fn run<L, W>(
    link: &L,
    topic: &str,
    notices: &mut mpsc::UnboundedReceiver<Notice>,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<Exit>
where
    L: Link,
    W: Write,
{
    tokio::pin!(shutdown);

    loop {
        let notice = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("subscriber interrupted");
                return Ok(Exit::Interrupted);
            }
            notice = notices.recv() => notice,
        };

        let Some(notice) = notice else {
            return Ok(Exit::LinkClosed);
        };

        match notice {
            Notice::Connected(code) => {
                writeln!(
                    out,
                    "Connected to {BROKER_HOST}:{BROKER_PORT} with result code : {}",
                    return_code(code)
                )?;
                if code == ConnectReturnCode::Success {
                    writeln!(out, "Subscribing to topic : {topic}")?;
                    if let Err(e) = link.subscribe(topic, QoS::AtMostOnce).await {
                        warn!("subscribe rejected by client: {e}");
                    }
                }
            }
            Notice::Received { topic: source, payload } => {
                writeln!(
                    out,
                    "received message on : {source} -> {}",
                    ByteLiteral(&payload[..])
                )?;
            }
            Notice::Delivered(_) => {}
        }
        out.flush()?;
    }
}

/// Renders a payload as a bytes literal: `b'mid1'`.
pub struct ByteLiteral<'a>(pub &'a [u8]);

impl fmt::Display for ByteLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.0.contains(&b'\'') && !self.0.contains(&b'"') {
            '"'
        } else {
            '\''
        };

        write!(f, "b{quote}")?;
        for &byte in self.0 {
            match byte {
                b'\\' => f.write_str("\\\\")?,
                b'\t' => f.write_str("\\t")?,
                b'\n' => f.write_str("\\n")?,
                b'\r' => f.write_str("\\r")?,
                b'\'' if quote == '\'' => f.write_str("\\'")?,
                0x20..=0x7e => write!(f, "{}", byte as char)?,
                _ => write!(f, "\\x{byte:02x}")?,
            }
        }
        write!(f, "{quote}")
    }
}
