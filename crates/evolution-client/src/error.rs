//! Error types for evolution-client

use std::path::PathBuf;

use thiserror::Error;

use crate::response::ApiResponse;

/// evolution-client error type
#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("Número inválido: {0}")]
    InvalidNumber(String),

    #[error("Arquivo '{}' não encontrado.", .0.display())]
    FileNotFound(PathBuf),

    #[error("O caminho '{}' não aponta para um arquivo.", .0.display())]
    NotAFile(PathBuf),

    #[error("Não foi possível determinar o MIME type do arquivo: {}", .0.display())]
    UnknownMimeType(PathBuf),

    #[error("Código de evento inválido: {0}")]
    InvalidEventCode(u32),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", .0.message)]
    Api(ApiResponse),
}

impl EvolutionError {
    /// Status code of the remote response, when the failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(envelope) => envelope.status_code,
            _ => None,
        }
    }

    /// Converts any failure into the uniform result envelope.
    pub fn into_envelope(self) -> ApiResponse {
        match self {
            Self::Api(envelope) => envelope,
            other => ApiResponse::failure(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for EvolutionError {
    fn from(err: reqwest::Error) -> Self {
        EvolutionError::Api(ApiResponse::failure(err.to_string()))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EvolutionError>;
