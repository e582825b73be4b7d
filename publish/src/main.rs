use std::process::ExitCode;

use clap::Parser;
use loadgen::{
    endpoint::{self, RECONNECT_DELAY, REQUEST_CAPACITY},
    publisher::{self, Outcome, Plan},
};
use rumqttc::AsyncClient;
use tokio::sync::mpsc;
use tracing::info;

/// Publish 20,000 numbered messages (`mid1`..`mid20000`) at QoS 2 to a topic
/// on localhost:1883.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Topic to publish to
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
        println!("please provide topic to publish");
        return Ok(ExitCode::FAILURE);
    };

    let options = endpoint::options("publish", None);
    let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
    let (tx, rx) = mpsc::unbounded_channel();
    let _pump = loadgen::spawn_pump(eventloop, tx, RECONNECT_DELAY);
    let _reporter = tokio::spawn(publisher::report(rx, std::io::stdout()));

    let plan = Plan::new(topic);
    let interrupt = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let mut stdout = std::io::stdout();

    match publisher::run(&client, &plan, &mut stdout, interrupt).await? {
        Outcome::Completed { submitted } => {
            info!(submitted, "send loop finished");
            println!("done");
        }
        Outcome::Interrupted { submitted } => {
            info!(submitted, "send loop interrupted");
        }
    }

    // Outstanding acknowledgements are not awaited; the runtime drops the
    // pump and reporter on return.
    Ok(ExitCode::SUCCESS)
}
