//! Path-aware JSON decoding for option files.
use serde::de::DeserializeOwned;

/// A decoding failure pinned to the option it concerns. A `path` of `.`
/// means the document as a whole (syntax errors, wrong top-level shape).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("at {path} → {message}")]
pub struct PathedError {
    pub path: String,
    pub message: String,
}

impl PathedError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathedError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        PathedError::new(err.path().to_string(), err.into_inner().to_string())
    })
}
