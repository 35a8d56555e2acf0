//! Ошибки `sipdict`: коды статуса, трейт [`ErrorExt`], ошибка с контекстом
//! [`StackError`] и доменные типы ошибок словаря.

pub mod code;
pub mod ext;
pub mod macros;
pub mod stack;
pub mod types;

pub use code::*;
pub use ext::*;
pub use macros::*;
pub use stack::*;
pub use types::*;

/// Результат операций верхнего уровня (загрузка конфигурации, бинарь).
pub type SipDictResult<T> = Result<T, StackError>;
