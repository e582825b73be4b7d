use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use loadgen::{
    endpoint::{self, RECONNECT_DELAY, REQUEST_CAPACITY, SUBSCRIBER_KEEP_ALIVE},
    subscriber::{self, Exit},
};
use rumqttc::AsyncClient;
use tokio::sync::mpsc;

/// Subscribe to a topic on localhost:1883 and print every message received.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Topic to subscribe to
    #[arg(allow_hyphen_values = true)]
    topic: Option<String>,

    /// Anything after the topic is accepted and ignored.
    #[arg(hide = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    loadgen::logging::init();

    let Some(topic) = Args::parse().topic else {
        println!("please provide topic to subscribe");
        return Ok(ExitCode::FAILURE);
    };

    let options = endpoint::options("subscribe", Some(SUBSCRIBER_KEEP_ALIVE));
    let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _pump = loadgen::spawn_pump(eventloop, tx, RECONNECT_DELAY);

    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let mut stdout = std::io::stdout();

    match subscriber::run(&client, &topic, &mut rx, &mut stdout, interrupt).await? {
        Exit::Interrupted => Ok(ExitCode::SUCCESS),
        Exit::LinkClosed => Err(anyhow!("client event loop stopped")),
    }
}
