use thiserror::Error;

use crate::context::ShaderStage;

/// Everything that can stop the quad from reaching the screen.
///
/// None of these are retried; the host decides how to surface them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Unable to initialize WebGL. Your browser or machine may not support it. ({0})")]
    ContextUnavailable(String),
    #[error("An error occurred compiling the {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("Unable to initialize the shader program: {log}")]
    Link { log: String },
    #[error("the linked program has no active attribute named `{0}`")]
    MissingAttribute(String),
    #[error("the linked program has no active uniform named `{0}`")]
    MissingUniform(String),
    #[error("the context could not create a {0}")]
    ResourceCreation(&'static str),
    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),
}

impl RenderError {
    /// Whether this failure came out of shader compilation or linking.
    pub fn is_shader_error(&self) -> bool {
        matches!(self, RenderError::Compile { .. } | RenderError::Link { .. })
    }
}

/// Replaces an absent or blank driver log so diagnostics are never empty.
pub(crate) fn diagnostic_or_placeholder(log: Option<String>) -> String {
    match log {
        Some(log) if !log.trim().is_empty() => log.trim_end().to_string(),
        _ => "no diagnostic was reported by the driver".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_stage() {
        let err = RenderError::Compile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:1: 'x' : syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "An error occurred compiling the fragment shader: ERROR: 0:1: 'x' : syntax error"
        );
        assert!(err.is_shader_error());
    }

    #[test]
    fn blank_logs_get_a_placeholder() {
        assert!(!diagnostic_or_placeholder(None).is_empty());
        assert!(!diagnostic_or_placeholder(Some("  \n".to_string())).is_empty());
        assert_eq!(diagnostic_or_placeholder(Some("bad\n".to_string())), "bad");
    }

    #[test]
    fn context_errors_are_not_shader_errors() {
        let err = RenderError::ContextUnavailable("no canvas".to_string());
        assert!(!err.is_shader_error());
        assert!(err.to_string().contains("no canvas"));
    }
}
