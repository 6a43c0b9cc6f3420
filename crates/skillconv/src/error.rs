#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error [{status}]: {detail}")]
    Service { status: u16, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
