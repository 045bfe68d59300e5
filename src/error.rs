use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced to the host page
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("graphics context unavailable: {0}")]
    Context(String),

    #[error("render setup failed: {0}")]
    Render(String),
}

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SceneError::Render("Shader compilation failed: oops".to_string());
        assert_eq!(err.to_string(), "render setup failed: Shader compilation failed: oops");

        let yaml_err = serde_yaml::from_str::<u32>("not a number").unwrap_err();
        let err = SceneError::from(yaml_err);
        assert!(err.to_string().starts_with("invalid scene config"));
    }
}
