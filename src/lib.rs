/// Параметры роста словаря и их загрузка из окружения.
pub mod config;
/// Хеш-словарь с инкрементальным рехешированием и его потокобезопасная
/// обёртка.
pub mod dict;
/// Настройка `tracing`: фильтры и форматы вывода.
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Конфигурация словаря.
pub use crate::config::DictConfig;
/// Словарь, хешер и статистика.
pub use dict::{
    ContentionSnapshot, Dict, DictHasher, DictIter, DictStats, SharedDict, Sip24Hasher,
    HASH_KEY_LEN,
};
/// Ошибки и коды статусов.
pub use sipdict_error::{DictError, DictResult, ErrorExt, SipDictResult, StackError, StatusCode};
/// Логирование.
pub use logging::{init_logging, LogFormat, LoggingConfig};
