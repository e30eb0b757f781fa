use std::io::{self, Read};

use serde_json::Value;
use serialport::SerialPort;
use tracing::{debug, error, instrument};

use crate::{
    utils::LineBuffer, Field, ReaderError, SerialConfig, TelemetrySnapshot,
};

/// Size of the scratch buffer used for a single read from the channel.
const READ_CHUNK: usize = 1024;

type Listener = Box<dyn FnMut(f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// The channel could not be opened. Nothing will ever be read.
    Closed,
    /// The channel is open and lines are being parsed.
    Open,
}

/// Reads newline-delimited JSON telemetry from a serial channel and keeps
/// the most recent values.
///
/// All access happens on one thread. Listeners registered with
/// [`subscribe`](Self::subscribe) run synchronously inside
/// [`handle_ready_read`](Self::handle_ready_read), after the whole snapshot
/// has been stored.
pub struct TelemetryReader<C = Box<dyn SerialPort>> {
    channel: Option<C>,
    lines: LineBuffer,
    snapshot: TelemetrySnapshot,
    listeners: [Vec<Listener>; 5],
}

impl TelemetryReader {
    /// Open the serial port described by `config`.
    ///
    /// A port that cannot be opened is logged and leaves the reader
    /// [`Closed`](ChannelState::Closed). It is never retried.
    #[instrument(skip_all, fields(port = %config.port_name))]
    pub fn open(config: &SerialConfig) -> Self {
        match config.open_channel() {
            Ok(port) => Self::with_channel(port),
            Err(e) => {
                error!("{e}");
                Self::closed()
            }
        }
    }
}

impl<C: Read> TelemetryReader<C> {
    /// Wrap an already open byte source.
    pub fn with_channel(channel: C) -> Self {
        Self::from_parts(Some(channel))
    }

    /// A reader whose channel failed to open.
    pub fn closed() -> Self {
        Self::from_parts(None)
    }

    fn from_parts(channel: Option<C>) -> Self {
        Self {
            channel,
            lines: LineBuffer::new(),
            snapshot: TelemetrySnapshot::default(),
            listeners: Default::default(),
        }
    }

    pub fn state(&self) -> ChannelState {
        if self.channel.is_some() {
            ChannelState::Open
        } else {
            ChannelState::Closed
        }
    }

    /// Read whatever the channel has available and process it.
    ///
    /// A read timeout means no data yet and returns `Ok(0)`, as does polling
    /// a closed reader. End of stream is reported as an I/O error; the
    /// reader does not try to reconnect.
    pub fn poll(&mut self) -> Result<usize, ReaderError> {
        let Some(channel) = self.channel.as_mut() else {
            return Ok(0);
        };

        let mut buf = [0u8; READ_CHUNK];
        let read = match channel.read(&mut buf) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.handle_ready_read(&buf[..read]))
    }

    /// Feed newly available bytes and process every complete line.
    ///
    /// Returns how many lines updated the snapshot. A trailing fragment
    /// without `\n` stays buffered until a later call completes it.
    pub fn handle_ready_read(&mut self, data: &[u8]) -> usize {
        if self.channel.is_none() {
            debug!("Ignoring {} bytes on closed channel", data.len());
            return 0;
        }

        self.lines.extend(data);

        let mut accepted = 0;
        while let Some(line) = self.lines.read_line() {
            if self.process_line(&line) {
                accepted += 1;
            }
        }
        accepted
    }

    fn process_line(&mut self, line: &[u8]) -> bool {
        let obj = match serde_json::from_slice::<Value>(line) {
            Ok(Value::Object(obj)) => obj,
            Ok(other) => {
                debug!("Skipping non-object line: {other}");
                return false;
            }
            Err(e) => {
                debug!("Skipping malformed line: {e}");
                return false;
            }
        };

        self.snapshot = TelemetrySnapshot::from_object(&obj);
        debug!("Updated telemetry: {:?}", self.snapshot);

        for field in Field::ALL {
            let value = self.snapshot.get(field);
            for listener in &mut self.listeners[field.index()] {
                listener(value);
            }
        }
        true
    }
}

impl<C> TelemetryReader<C> {
    /// Register a callback run with the new value each time `field` is
    /// updated.
    pub fn subscribe(&mut self, field: Field, listener: impl FnMut(f64) + 'static) {
        self.listeners[field.index()].push(Box::new(listener));
    }

    pub fn on_yaw_changed(&mut self, listener: impl FnMut(f64) + 'static) {
        self.subscribe(Field::Yaw, listener);
    }

    pub fn on_pitch_changed(&mut self, listener: impl FnMut(f64) + 'static) {
        self.subscribe(Field::Pitch, listener);
    }

    pub fn on_roll_changed(&mut self, listener: impl FnMut(f64) + 'static) {
        self.subscribe(Field::Roll, listener);
    }

    pub fn on_latitude_changed(&mut self, listener: impl FnMut(f64) + 'static) {
        self.subscribe(Field::Latitude, listener);
    }

    pub fn on_longitude_changed(&mut self, listener: impl FnMut(f64) + 'static) {
        self.subscribe(Field::Longitude, listener);
    }

    pub fn yaw(&self) -> f64 {
        self.snapshot.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.snapshot.pitch
    }

    pub fn roll(&self) -> f64 {
        self.snapshot.roll
    }

    pub fn latitude(&self) -> f64 {
        self.snapshot.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.snapshot.longitude
    }

    pub fn get(&self, field: Field) -> f64 {
        self.snapshot.get(field)
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot
    }
}
