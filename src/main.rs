use std::time::Duration;

use attitude_link::{ChannelState, Field, SerialConfig, TelemetryReader};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How often the port is checked for new bytes.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(false)
        .init();

    let config = SerialConfig::resolve(std::env::args().nth(1));
    let mut reader = TelemetryReader::open(&config);

    for field in Field::ALL {
        reader.subscribe(field, move |value| info!("{} = {value}", field.key()));
    }

    if reader.state() == ChannelState::Closed {
        warn!("No telemetry will arrive from {}", config.port_name);
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut interval = time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The reader lives on this task only. Dropping it at the end of main
    // closes the port.
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = reader.poll() {
                    error!("{e}");
                    break;
                }
            }
        }
    }
}
