use serde_json::{Map, Value};

/// Look up a numeric member of a JSON object.
///
/// Returns `0.0` when the key is absent or its value is not a number.
#[must_use]
pub fn number_field(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Accumulates raw bytes and hands them back one `\n`-terminated line at a
/// time. Anything after the last delimiter stays buffered.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Whether a complete line is waiting.
    #[must_use]
    pub fn can_read_line(&self) -> bool {
        self.buf.contains(&b'\n')
    }

    /// Remove and return the next complete line, delimiter included.
    pub fn read_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        Some(self.buf.drain(..=end).collect())
    }

    /// Number of bytes waiting for a delimiter.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
