use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sipdict_error::{GenericError, StackError, StatusCode};

/// Переменная окружения с уровнем логирования.
pub const ENV_LOG_LEVEL: &str = "SIPDICT_LOG_LEVEL";
/// Переменная окружения с форматом вывода.
pub const ENV_LOG_FORMAT: &str = "SIPDICT_LOG_FORMAT";

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Многострочный человекочитаемый вывод.
    Pretty,
    /// Однострочный вывод.
    #[default]
    Compact,
    /// Одна JSON-запись на событие.
    Json,
}

/// Настройки логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для целей `sipdict` (trace, debug, info, warn, error).
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_line_numbers: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl LoggingConfig {
    /// Перекрывает уровень и формат значениями из окружения. Нераспознанный
    /// формат игнорируется.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            self.level = level.trim().to_lowercase();
        }

        if let Some(format) = std::env::var(ENV_LOG_FORMAT)
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<(), StackError> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(GenericError::new(
                StatusCode::InvalidConfig,
                format!(
                    "invalid log level '{}', expected one of {}",
                    self.level,
                    LEVELS.join(", ")
                ),
            )
            .into());
        }

        Ok(())
    }

    /// Директива `EnvFilter`: сторонние цели на `warn`, собственные на
    /// заданном уровне.
    pub fn build_filter_directive(&self) -> String {
        format!("warn,sipdict={}", self.level)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для LoggingConfig, LogFormat
////////////////////////////////////////////////////////////////////////////////

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_line_numbers: false,
        }
    }
}

impl FromStr for LogFormat {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(GenericError::new(
                StatusCode::InvalidConfig,
                format!("unknown log format '{other}'"),
            )
            .into()),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
