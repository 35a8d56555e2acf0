use std::{any::Any, error::Error};

use crate::StatusCode;

/// Общий интерфейс ошибок `sipdict`.
///
/// Трейт object-safe: [`StackError`](crate::StackError) хранит корневую
/// ошибку как `dyn ErrorExt`.
pub trait ErrorExt: Error + Send + Sync + 'static {
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Для downcast к конкретному типу.
    fn as_any(&self) -> &dyn Any;

    /// Короткое имя источника ошибки для тегов (`"dict"`, `"generic"`).
    fn kind(&self) -> &'static str {
        "generic"
    }

    /// Сообщение, которое можно показать снаружи. Внутренние ошибки не
    /// раскрывают содержимое ключей.
    fn client_message(&self) -> String {
        if self.status_code() == StatusCode::Internal {
            "Internal error".to_string()
        } else {
            self.to_string()
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", self.kind().to_string()),
            ("status_code", self.status_code().code().to_string()),
        ]
    }
}
