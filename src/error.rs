use std::error::Error;
use std::fmt;

use crate::config::ConfigError;
use crate::ordering::OrdinalBound;

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Db(sea_orm::DbErr),
    Json(serde_json::Error),
    Config(ConfigError),
    NotFound(String),
    InvalidInput(String),
    InvalidPosition {
        field: &'static str,
        requested: i32,
        bound: OrdinalBound,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Db(err) => write!(f, "database error: {err}"),
            AppError::Json(err) => write!(f, "json error: {err}"),
            AppError::Config(err) => write!(f, "config error: {err}"),
            AppError::NotFound(message) => write_multiline(f, "Not found", message),
            AppError::InvalidInput(message) => write_multiline(f, "Invalid input", message),
            AppError::InvalidPosition {
                field,
                requested,
                bound,
            } => write!(
                f,
                "Invalid position: {field} {requested} is outside [{}, {}]",
                bound.min, bound.max
            ),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Db(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::NotFound(_) | AppError::InvalidInput(_) | AppError::InvalidPosition { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

fn write_multiline(f: &mut fmt::Formatter<'_>, label: &str, message: &str) -> fmt::Result {
    if message.contains('\n') {
        write!(f, "{label}:\n{message}")
    } else {
        write!(f, "{label}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_position_reports_bound() {
        let err = AppError::InvalidPosition {
            field: "order_in_plan",
            requested: 7,
            bound: OrdinalBound { min: 1, max: 5 },
        };
        assert_eq!(
            err.to_string(),
            "Invalid position: order_in_plan 7 is outside [1, 5]"
        );
    }

    #[test]
    fn multiline_not_found_breaks_after_label() {
        let err = AppError::NotFound("exercise plan id 4\nworkout plan id 2".to_string());
        assert_eq!(
            err.to_string(),
            "Not found:\nexercise plan id 4\nworkout plan id 2"
        );
    }
}
