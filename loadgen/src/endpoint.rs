use std::time::Duration;

use rumqttc::MqttOptions;
use uuid::Uuid;

pub const BROKER_HOST: &str = "localhost";
pub const BROKER_PORT: u16 = 1883;

/// Keep-alive the subscriber asks for. The publisher keeps the client default.
pub const SUBSCRIBER_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Pause between a connection error and the next connection attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Capacity of the request queue between a client handle and its event loop.
pub const REQUEST_CAPACITY: usize = 1024;

/// Builds connection options for the fixed broker endpoint.
///
/// Every process gets its own client id (`<role>-<8 hex digits>`) so that two
/// runs against the same broker never kick each other off.
pub fn options(role: &str, keep_alive: Option<Duration>) -> MqttOptions {
    let mut options = MqttOptions::new(client_id(role), BROKER_HOST, BROKER_PORT);
    if let Some(keep_alive) = keep_alive {
        options.set_keep_alive(keep_alive);
    }
    options
}

fn client_id(role: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{role}-{}", &suffix[..8])
}
