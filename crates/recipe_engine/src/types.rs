use std::fmt;

use recipe_core::{Food, Generation, ReadinessState, Recipe};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Readiness(ReadinessState),
    RecipesFetched {
        generation: Generation,
        result: Result<Vec<Recipe>, ApiError>,
    },
    FoodsFound {
        query: String,
        result: Result<Vec<Food>, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    QueryTooShort { min_chars: usize },
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Decode => write!(f, "malformed response body"),
            ApiErrorKind::QueryTooShort { min_chars } => {
                write!(f, "query shorter than {min_chars} characters")
            }
        }
    }
}
