//! Writes synthetic telemetry lines to a serial port, for exercising the
//! reader through a virtual null-modem pair.

use std::{
    io::{self, Write},
    time::Duration,
};

use attitude_link::{ReaderError, SerialConfig, TelemetrySnapshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, Level};

const SEND_INTERVAL: Duration = Duration::from_millis(250);

/// A slow circle around a fixed origin with a gentle oscillation in attitude.
fn synthetic(step: u32) -> TelemetrySnapshot {
    let t = f64::from(step) * SEND_INTERVAL.as_secs_f64();

    TelemetrySnapshot {
        yaw: (t * 10.0) % 360.0,
        pitch: 15.0 * (t * 0.5).sin(),
        roll: 30.0 * (t * 0.3).cos(),
        latitude: -6.914744 + 0.001 * (t * 0.05).sin(),
        longitude: 107.609810 + 0.001 * (t * 0.05).cos(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ReaderError> {
    tracing_subscriber::fmt::fmt()
        .with_max_level(Level::INFO)
        .with_file(false)
        .init();

    let config = SerialConfig::resolve(std::env::args().nth(1));
    let mut port = config.open_channel()?;

    let mut interval = time::interval(SEND_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Emitting telemetry on {}", config.port_name);

    let mut step: u32 = 0;
    loop {
        interval.tick().await;

        let packet = synthetic(step);
        step = step.wrapping_add(1);

        let mut line = serde_json::to_vec(&packet).map_err(io::Error::from)?;
        line.push(b'\n');

        port.write_all(&line)?;
        port.flush()?;

        debug!("Sent {} bytes", line.len());
    }
}
