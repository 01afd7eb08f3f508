use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum EffectsError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element not found: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid effects config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("effects config out of range: {0}")]
    InvalidConfig(String),
}

impl From<JsValue> for EffectsError {
    fn from(value: JsValue) -> Self {
        EffectsError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T> = std::result::Result<T, EffectsError>;
