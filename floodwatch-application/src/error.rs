use floodwatch_core::{
    gateways::Error as GatewayError, map::Error as MapError,
    repositories::Error as RepoError, usecases::Error as ParameterError,
};
use std::{fmt, io};
use thiserror::Error;

pub use floodwatch_core::repositories;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(BError::Repo(err))
    }
}

impl From<ParameterError> for AppError {
    fn from(err: ParameterError) -> AppError {
        AppError::Business(err.into())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> AppError {
        AppError::Business(err.into())
    }
}

impl From<MapError> for AppError {
    fn from(err: MapError) -> AppError {
        AppError::Business(err.into())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum BError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Map(#[from] MapError),
}

pub const ALERT_TITLE: &str = "Error";

/// A short message for the user about a failed operation.
///
/// The details of the failure only go into the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAlert {
    pub title: String,
    pub message: String,
}

impl UserAlert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_owned(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UserAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for UserAlert {}

pub trait AlertOnError<T> {
    /// Log the error and replace it by an alert with the given message.
    fn or_alert(self, message: &str) -> Result<T, UserAlert>;
}

impl<T> AlertOnError<T> for Result<T, AppError> {
    fn or_alert(self, message: &str) -> Result<T, UserAlert> {
        self.map_err(|err| {
            warn!("{message}: {err}");
            UserAlert::error(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_hides_error_details() {
        let res: Result<(), AppError> = Err(GatewayError::Status {
            code: 500,
            body: "internal details".into(),
        }
        .into());
        let alert = res.or_alert("Failed to fetch address suggestions").unwrap_err();
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "Failed to fetch address suggestions");
        assert!(!alert.to_string().contains("internal"));
    }
}
