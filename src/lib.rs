pub mod error;
pub mod reader;
pub mod serial;
pub mod utils;

pub use error::ReaderError;
pub use reader::{ChannelState, TelemetryReader};
pub use serial::SerialConfig;

use serde::{Deserialize, Serialize};

/// The latest attitude and position reported by the device.
///
/// Every field starts at `0.0` and is overwritten as a whole each time a
/// line is accepted. Nothing older than the current record is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl TelemetrySnapshot {
    /// Build a snapshot from a decoded JSON object.
    ///
    /// Missing or non-numeric members resolve to `0.0`.
    #[must_use]
    pub fn from_object(obj: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            yaw: utils::number_field(obj, Field::Yaw.key()),
            pitch: utils::number_field(obj, Field::Pitch.key()),
            roll: utils::number_field(obj, Field::Roll.key()),
            latitude: utils::number_field(obj, Field::Latitude.key()),
            longitude: utils::number_field(obj, Field::Longitude.key()),
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Yaw => self.yaw,
            Field::Pitch => self.pitch,
            Field::Roll => self.roll,
            Field::Latitude => self.latitude,
            Field::Longitude => self.longitude,
        }
    }
}

/// One of the five observable telemetry properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Yaw,
    Pitch,
    Roll,
    Latitude,
    Longitude,
}

impl Field {
    /// All fields, in the order change notifications are raised.
    pub const ALL: [Field; 5] = [
        Field::Yaw,
        Field::Pitch,
        Field::Roll,
        Field::Latitude,
        Field::Longitude,
    ];

    /// Name of the JSON member carrying this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Field::Yaw => "yaw",
            Field::Pitch => "pitch",
            Field::Roll => "roll",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
