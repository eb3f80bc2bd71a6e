use thiserror::Error;

/// Engine-wide error.
///
/// Keep this small and stable. Modules can define their own error types and map them into EngineError.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("exit requested")]
    ExitRequested,

    #[error("config error: {0}")]
    Config(String),

    #[error("module error [{module}]: {source}")]
    Module {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl EngineError {
    #[inline]
    pub fn module(module: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Module {
            module,
            source: source.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
