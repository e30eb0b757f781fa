#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("failed to open serial port {port}: {source}")]
    ChannelOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("serial channel read failed: {0}")]
    Io(#[from] std::io::Error),
}
