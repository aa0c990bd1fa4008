/// Errors raised at the extension host boundary
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum HostError {
    /// A bridge call threw or its promise rejected.
    #[error("host call failed: {0}")]
    Bridge(String),
    /// A value could not cross the bridge or be decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl HostError {
    pub fn bridge(err: JsValue) -> Self {
        HostError::Bridge(format!("{:?}", err))
    }
}

impl From<serde_wasm_bindgen::Error> for HostError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        HostError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(err: serde_json::Error) -> Self {
        HostError::Serialization(err.to_string())
    }
}
