pub mod dict;

pub use dict::*;

use std::{any::Any, fmt};

use crate::{ErrorExt, StatusCode};

/// Ошибка без собственного типа: код статуса и текст.
///
/// Используется для сбоев окружения (конфигурация, установка логгера), у
/// которых нет доменных полей.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericError {
    code: StatusCode,
    message: String,
}

impl GenericError {
    pub fn new(
        code: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GenericError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GenericError {}

impl ErrorExt for GenericError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
