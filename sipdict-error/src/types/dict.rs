use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

pub type DictResult<T> = Result<T, DictError>;

/// Ошибки словаря.
///
/// Отсутствие ключа ошибкой не считается: `get`/`delete` возвращают `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictError {
    /// Ключ обнаружен в целевом бакете после того, как поиск его не нашёл.
    /// Возникает только при мутации в обход эксклюзивной блокировки.
    #[error("unexpectedly found an entry with the same key on insert: {key}")]
    InternalInvariantViolation { key: String },
    /// Запрошенная ёмкость превышает потолок таблицы.
    #[error("capacity overflow: requested {requested} buckets, maximum is {max}")]
    CapacityOverflow { requested: usize, max: usize },
    /// Невалидное значение параметра конфигурации.
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl DictError {
    /// Строит `InternalInvariantViolation` из бинарного ключа.
    pub fn invariant_violation(key: &[u8]) -> Self {
        Self::InternalInvariantViolation {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }
}

impl ErrorExt for DictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalInvariantViolation { .. } => StatusCode::Internal,
            Self::CapacityOverflow { .. } => StatusCode::CapacityExceeded,
            Self::InvalidConfig { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::InternalInvariantViolation { .. } => "Internal error".to_string(),
            Self::CapacityOverflow { .. } => "Dictionary capacity exceeded".to_string(),
            Self::InvalidConfig { field, .. } => format!("Invalid configuration: {field}"),
        }
    }

    fn kind(&self) -> &'static str {
        "dict"
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.kind().to_string()),
            ("status_code", self.status_code().code().to_string()),
        ];

        match self {
            Self::CapacityOverflow { requested, max } => {
                tags.push(("requested", requested.to_string()));
                tags.push(("max", max.to_string()));
            }
            Self::InvalidConfig { field, .. } => {
                tags.push(("field", field.to_string()));
            }
            Self::InternalInvariantViolation { .. } => {}
        }

        tags
    }
}
