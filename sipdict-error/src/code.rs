use std::fmt;

use num_enum::TryFromPrimitive;

/// Код статуса ошибки.
///
/// Диапазоны: `1xxx` общие ошибки и конфигурация, `2xxx` ключи, `3xxx`
/// таблицы и блокировки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    Success = 0,

    Internal = 1000,
    InvalidArgs = 1001,
    InvalidConfig = 1002,

    InvalidKey = 2000,
    NotFound = 2001,
    AlreadyExists = 2002,

    CapacityExceeded = 3000,
    LockError = 3001,
}

/// Чья это ошибка.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ok,
    /// Неверный ввод вызывающей стороны.
    Caller,
    /// Сбой внутри словаря или окружения.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// `None` для неизвестного числа.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Internal => "Internal",
            Self::InvalidArgs => "InvalidArgs",
            Self::InvalidConfig => "InvalidConfig",
            Self::InvalidKey => "InvalidKey",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::CapacityExceeded => "CapacityExceeded",
            Self::LockError => "LockError",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Success => Category::Ok,
            Self::InvalidArgs
            | Self::InvalidConfig
            | Self::InvalidKey
            | Self::NotFound
            | Self::AlreadyExists => Category::Caller,
            Self::Internal | Self::CapacityExceeded | Self::LockError => Category::Internal,
        }
    }

    /// Нарушенный инвариант или исчерпанная ёмкость: словарь дальше
    /// использовать нельзя.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Internal | Self::CapacityExceeded)
    }

    pub fn log_level(self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound | Self::AlreadyExists => LogLevel::Debug,
            Self::InvalidArgs | Self::InvalidConfig | Self::InvalidKey => LogLevel::Info,
            Self::LockError => LogLevel::Warn,
            Self::Internal | Self::CapacityExceeded => LogLevel::Error,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
