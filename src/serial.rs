use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::info;

use crate::ReaderError;

#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM5";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Environment variable that overrides [`DEFAULT_PORT`].
pub const PORT_ENV: &str = "ATTITUDE_LINK_PORT";

pub const BAUD_RATE: u32 = 9600;

/// How long a single read waits for bytes before reporting none available.
pub const READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Settings for the telemetry serial link. The device always talks 8-N-1
/// without flow control, so only the port name normally changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT.to_string(),
            baud_rate: BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: READ_TIMEOUT,
        }
    }
}

impl SerialConfig {
    #[must_use]
    pub fn with_port(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    /// Pick the port from an explicit argument, then the environment, then
    /// the platform default.
    #[must_use]
    pub fn resolve(arg: Option<String>) -> Self {
        let port = arg
            .or_else(|| std::env::var(PORT_ENV).ok())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PORT.to_string());

        Self::with_port(port)
    }

    /// Open the port with these settings.
    pub fn open_channel(&self) -> Result<Box<dyn SerialPort>, ReaderError> {
        let port = serialport::new(&self.port_name, self.baud_rate)
            .data_bits(self.data_bits)
            .parity(self.parity)
            .stop_bits(self.stop_bits)
            .flow_control(self.flow_control)
            .timeout(self.timeout)
            .open()
            .map_err(|source| ReaderError::ChannelOpen {
                port: self.port_name.clone(),
                source,
            })?;

        info!("Serial port open on {} at {} baud", self.port_name, self.baud_rate);

        Ok(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_9600_8n1() {
        let config = SerialConfig::default();

        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[test]
    fn explicit_port_wins() {
        let config = SerialConfig::resolve(Some("/dev/ttyS7".to_string()));
        assert_eq!(config.port_name, "/dev/ttyS7");
        assert_eq!(config.baud_rate, BAUD_RATE);
    }

    #[test]
    fn missing_port_reports_channel_open() {
        let config = SerialConfig::with_port("/nonexistent/attitude-link-test");

        match config.open_channel() {
            Err(ReaderError::ChannelOpen { port, .. }) => {
                assert_eq!(port, "/nonexistent/attitude-link-test");
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("port should not exist"),
        }
    }
}
