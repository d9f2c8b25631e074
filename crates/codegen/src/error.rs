/// Errors raised while preparing an emit plan.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The project configuration is unreadable or holds an invalid value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A fixed-size struct can never fit in one message.
    #[error("struct {name} needs {size} bytes but max_message_size is {limit}")]
    MessageTooLarge { name: String, size: u64, limit: u64 },

    /// A fixed-size struct whose total size does not fit in a `u64`.
    #[error("struct {name} needs more than {} bytes but max_message_size is {limit}", u64::MAX)]
    SizeOverflow { name: String, limit: u64 },

    /// An I/O error occurred while reading a config file.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<toml::de::Error> for CodegenError {
    fn from(e: toml::de::Error) -> Self {
        CodegenError::InvalidConfig(e.to_string())
    }
}
