#![forbid(unsafe_code)]

//! Error type shared by the Waypoint crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TourError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// The step list failed schema validation; the tour was not started.
    #[error("invalid tour steps: {}", .errors.join("; "))]
    InvalidSteps { errors: Vec<String> },

    /// An imperative edit named a step id that is not in the running tour.
    #[error("step not found: {id}")]
    StepNotFound { id: String },

    /// An imperative edit was issued while no tour is running.
    #[error("no tour is running")]
    NotRunning,

    /// Activation was requested before any tour definition was loaded.
    #[error("no tour definition is loaded")]
    NotLoaded,

    /// A host payload could not be decoded.
    #[error("malformed payload: {message}")]
    Payload { message: String },
}

impl TourError {
    #[must_use]
    pub fn invalid_steps(errors: Vec<String>) -> Self {
        Self::InvalidSteps { errors }
    }

    #[must_use]
    pub fn step_not_found(id: impl Into<String>) -> Self {
        Self::StepNotFound { id: id.into() }
    }

    #[must_use]
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Validator messages carried by this error, if any.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::InvalidSteps { errors } => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for TourError {
    fn from(err: serde_json::Error) -> Self {
        Self::payload(err.to_string())
    }
}
