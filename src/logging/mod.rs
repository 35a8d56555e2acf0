pub mod config;
mod filters;
mod formatter;

pub use self::config::{LogFormat, LoggingConfig};
pub use formatter::build_formatter_with_writer;
use sipdict_error::{GenericError, StackError, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация логирования с конфигурацией.
///
/// Переменные окружения `SIPDICT_LOG_LEVEL`/`SIPDICT_LOG_FORMAT` перекрывают
/// конфигурацию, а `RUST_LOG` перекрывает итоговый фильтр целиком. Повторная
/// инициализация в одном процессе возвращает ошибку.
pub fn init_logging(mut config: LoggingConfig) -> Result<(), StackError> {
    config.apply_env_overrides();
    config.validate()?;

    let env_filter = filters::build_filter_from_config(&config);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatter::build_formatter_from_config(&config))
        .try_init()
        .map_err(|e| {
            StackError::from(GenericError::new(
                StatusCode::Internal,
                format!("failed to install global subscriber: {e}"),
            ))
        })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        "Logging system initialized"
    );

    Ok(())
}
