use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, EventLoop, QoS};
use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::{debug, error, trace};

use crate::notice::Notice;

/// Outbound half of a broker session, as seen by the driver loops.
#[allow(async_fn_in_trait)]
pub trait Link {
    async fn publish(&self, topic: &str, qos: QoS, payload: String) -> anyhow::Result<()>;

    async fn subscribe(&self, topic: &str, qos: QoS) -> anyhow::Result<()>;
}

impl Link for AsyncClient {
    async fn publish(&self, topic: &str, qos: QoS, payload: String) -> anyhow::Result<()> {
        AsyncClient::publish(self, topic, qos, false, payload).await?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str, qos: QoS) -> anyhow::Result<()> {
        AsyncClient::subscribe(self, topic, qos).await?;
        Ok(())
    }
}

/// Drives the client event loop on its own task and forwards notices.
///
/// Connection errors are logged and the next poll reconnects, after waiting
/// `retry_delay`. A refused CONNACK is forwarded as [`Notice::Connected`] so
/// the drivers can report its code. The task ends only once the receiving
/// side is dropped.
pub fn spawn_pump(
    mut eventloop: EventLoop,
    notices: mpsc::UnboundedSender<Notice>,
    retry_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let polled = tokio::select! {
                biased;
                _ = notices.closed() => break,
                polled = eventloop.poll() => polled,
            };

            let failed = match polled {
                Ok(event) => {
                    trace!(?event, "client event");
                    if let Some(notice) = Notice::from_event(event) {
                        if notices.send(notice).is_err() {
                            break;
                        }
                    }
                    false
                }
                Err(ConnectionError::ConnectionRefused(code)) => {
                    error!(?code, "broker refused the connection");
                    let _ = notices.send(Notice::Connected(code));
                    true
                }
                Err(e) => {
                    error!("connection error: {e}");
                    true
                }
            };

            if failed {
                tokio::select! {
                    biased;
                    _ = notices.closed() => break,
                    _ = time::sleep(retry_delay) => {}
                }
            }
        }
        debug!("notice receiver gone, stopping event loop");
    })
}
