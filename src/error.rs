use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("could not layer config: {0}")]
    Layer(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("progress storage unavailable: {0}")]
    Unavailable(String),
    #[error("progress storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech synthesis unavailable: {0}")]
    Unavailable(String),
    #[error("speech synthesis rejected the utterance: {0}")]
    Rejected(String),
}
