use bytes::Bytes;
use rumqttc::{ConnectReturnCode, Event, Packet};

/// The slice of client activity the test drivers care about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The broker answered the CONNECT, successfully or not.
    Connected(ConnectReturnCode),
    /// A QoS 2 publish finished its handshake (PUBCOMP received).
    Delivered(u16),
    /// A message arrived on a subscribed topic.
    Received { topic: String, payload: Bytes },
}

impl Notice {
    /// Picks out the events that map to a notice. Everything else (pings,
    /// intermediate QoS 2 acks, outgoing traffic) is dropped.
    pub fn from_event(event: Event) -> Option<Notice> {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) => Some(Notice::Connected(ack.code)),
            Event::Incoming(Packet::PubComp(comp)) => Some(Notice::Delivered(comp.pkid)),
            Event::Incoming(Packet::Publish(publish)) => Some(Notice::Received {
                topic: publish.topic,
                payload: publish.payload,
            }),
            _ => None,
        }
    }
}

/// Numeric form of a CONNACK return code, as MQTT 3.1.1 puts it on the wire.
pub fn return_code(code: ConnectReturnCode) -> u8 {
    code as u8
}
