use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("OpenCV Error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config Error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Address Error: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error("Model output shape mismatch: {0}")]
    ModelShape(String),
}
