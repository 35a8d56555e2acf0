use serde::{Deserialize, Serialize};

use config::{Config, Environment};
use sipdict_error::{DictError, DictResult, GenericError, StackError, StatusCode};

use crate::dict::{INITIAL_SIZE, MAX_CAPACITY};

/// Префикс переменных окружения: `SIPDICT_INITIAL_SIZE` и т.д.
pub const ENV_PREFIX: &str = "SIPDICT";

/// Параметры роста и рехеширования словаря.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    /// Ёмкость ht[0] при первой вставке, степень двойки.
    pub initial_size: usize,
    /// Сколько непустых бакетов переносит один шаг рехеширования.
    pub rehash_steps: usize,
    /// Множитель бюджета пустых бакетов на один шаг.
    pub empty_visits_factor: usize,
}

impl DictConfig {
    /// Загружает конфигурацию: значения по умолчанию, затем переменные
    /// окружения с префиксом `SIPDICT_`.
    pub fn load() -> Result<Self, StackError> {
        let defaults = Self::default();

        let cfg = Config::builder()
            .set_default("initial_size", defaults.initial_size as i64)
            .and_then(|b| b.set_default("rehash_steps", defaults.rehash_steps as i64))
            .and_then(|b| {
                b.set_default("empty_visits_factor", defaults.empty_visits_factor as i64)
            })
            .map_err(config_error)?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(config_error)?;

        let loaded: Self = cfg.try_deserialize().map_err(config_error)?;
        loaded.validate()?;

        Ok(loaded)
    }

    pub fn validate(&self) -> DictResult<()> {
        if self.initial_size == 0 || !self.initial_size.is_power_of_two() {
            return Err(DictError::InvalidConfig {
                field: "initial_size",
                reason: format!("must be a power of two, got {}", self.initial_size),
            });
        }

        if self.initial_size > MAX_CAPACITY {
            return Err(DictError::InvalidConfig {
                field: "initial_size",
                reason: format!("must not exceed {MAX_CAPACITY}"),
            });
        }

        if self.rehash_steps == 0 {
            return Err(DictError::InvalidConfig {
                field: "rehash_steps",
                reason: "must be at least 1".into(),
            });
        }

        if self.empty_visits_factor == 0 {
            return Err(DictError::InvalidConfig {
                field: "empty_visits_factor",
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> StackError {
    GenericError::new(StatusCode::InvalidConfig, err.to_string()).into()
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            initial_size: INITIAL_SIZE,
            rehash_steps: 1,
            empty_visits_factor: 10,
        }
    }
}
