//! Send loop and acknowledgement reporting for the `publish` client.

use std::{
    future::{ready, Future},
    io::Write,
    time::Duration,
};

use rumqttc::QoS;
use tokio::{sync::mpsc, time};
use tracing::{info, warn};

use crate::{
    endpoint::{BROKER_HOST, BROKER_PORT},
    link::Link,
    notice::{return_code, Notice},
};


pub const MESSAGE_COUNT: u32 = 20_000;
pub const SEND_INTERVAL: Duration = Duration::from_millis(1);

/// What one publisher run sends.
#[derive(Debug, Clone)]
pub struct Plan {
    pub topic: String,
    pub count: u32,
    pub interval: Duration,
    pub qos: QoS,
}

impl Plan {
    pub fn new(topic: impl Into<String>) -> Self {
        Plan {
            topic: topic.into(),
            count: MESSAGE_COUNT,
            interval: SEND_INTERVAL,
            qos: QoS::ExactlyOnce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { submitted: u32 },
    Interrupted { submitted: u32 },
}

/// Payloads `mid1` through `mid<count>`, in order.
pub fn payloads(count: u32) -> impl Iterator<Item = String> {
    (1..=count).map(|n| format!("mid{n}"))
}

/// Submits every payload of the plan, pausing `plan.interval` after each.
///
/// A rejected submission is logged and skipped; there is no retry. The loop
/// stops early only if `shutdown` resolves. Acknowledgements are not awaited.
pub async fn run<L, W>(
    link: &L,
    plan: &Plan,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<Outcome>
where
    L: Link,
    W: Write,
{
    tokio::pin!(shutdown);
    let mut submitted = 0;

    for payload in payloads(plan.count) {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(submitted, "publisher interrupted");
                return Ok(Outcome::Interrupted { submitted });
            }
            _ = ready(()) => {}
        }

        writeln!(
            out,
            "publishing message to topic : {} -> {}",
            plan.topic, payload
        )?;

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(submitted, "publisher interrupted");
                return Ok(Outcome::Interrupted { submitted });
            }
            result = link.publish(&plan.topic, plan.qos, payload) => {
                if let Err(e) = result {
                    warn!("publish rejected by client: {e}");
                }
                submitted += 1;
            }
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(submitted, "publisher interrupted");
                return Ok(Outcome::Interrupted { submitted });
            }
            _ = time::sleep(plan.interval) => {}
        }
    }

    Ok(Outcome::Completed { submitted })
}

/// Prints connect and delivery notices until the sender side goes away.
pub async fn report<W: Write>(
    mut notices: mpsc::UnboundedReceiver<Notice>,
    mut out: W,
) -> std::io::Result<W> {
    while let Some(notice) = notices.recv().await {
        match notice {
            Notice::Connected(code) => writeln!(
                out,
                "Connected successfully to {BROKER_HOST}:{BROKER_PORT} with result code {}",
                return_code(code)
            )?,
            Notice::Delivered(pkid) => {
                writeln!(out, "message successfully sent to topic with ID {pkid}")?
            }
            Notice::Received { .. } => {}
        }
        out.flush()?;
    }

    Ok(out)
}
