//! Демонстрационный бинарь `sipdict`.
//!
//! `demo` прогоняет базовый сценарий (set, get, delete, перезапись),
//! `bulk` заливает в словарь случайные ключи и печатает статистику таблиц.

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::{distributions::Alphanumeric, Rng};
use sipdict::{init_logging, Dict, DictConfig, LoggingConfig, SharedDict};
use sipdict_error::{LogLevel, ResultExt, SipDictResult, StackError};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(name = "sipdict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SipHash dictionary with incremental rehashing", long_about = None)]
struct Cli {
    /// Уровень логирования (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "SIPDICT_LOG_LEVEL")]
    log_level: String,
    /// Формат логов (pretty, compact, json)
    #[arg(long, default_value = "compact", env = "SIPDICT_LOG_FORMAT")]
    log_format: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Базовый сценарий: set, get, delete, перезапись
    Demo,
    /// Массовая вставка случайных ключей
    Bulk {
        /// Количество ключей
        #[arg(short, long, default_value_t = 100_000)]
        count: usize,
        /// Длина ключа в символах
        #[arg(long, default_value_t = 16)]
        key_len: usize,
        /// Удалять каждый N-й вставленный ключ (0 - не удалять)
        #[arg(long, default_value_t = 0)]
        delete_every: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LoggingConfig {
        level: cli.log_level.trim().to_lowercase(),
        format: cli.log_format.parse()?,
        ..LoggingConfig::default()
    };
    init_logging(log_config)?;

    let outcome = DictConfig::load().and_then(|config| match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => run_demo(config),
        Commands::Bulk {
            count,
            key_len,
            delete_every,
        } => run_bulk(config, count, key_len, delete_every),
    });

    if let Err(err) = &outcome {
        report(err);
    }

    Ok(outcome?)
}

fn run_demo(config: DictConfig) -> SipDictResult<()> {
    let dict = SharedDict::with_config(config)?;

    dict.set("key1".to_string(), "value1".to_string())
        .context("set key1")?;
    dict.set("key2".to_string(), "value2".to_string())
        .context("set key2")?;

    for key in ["key1", "key2"] {
        match dict.get(key) {
            Some(value) => println!("{key}: {value}"),
            None => println!("{key}: entry not found"),
        }
    }

    match dict.delete("key1") {
        Some(_) => info!(key = "key1", "deleted"),
        None => warn!(key = "key1", "entry not found"),
    }

    dict.set("key2".to_string(), "updated_value2".to_string())
        .context("update key2")?;

    let mut items: Vec<_> = dict.get_all_items().into_iter().collect();
    items.sort();

    println!("all items:");
    for (key, value) in items {
        println!("  {key}: {value}");
    }

    Ok(())
}

fn run_bulk(
    config: DictConfig,
    count: usize,
    key_len: usize,
    delete_every: usize,
) -> SipDictResult<()> {
    let mut dict = Dict::with_config(config)?;
    let mut rng = rand::thread_rng();
    let start = Instant::now();
    let mut deleted = 0usize;

    for i in 0..count {
        let key: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(key_len)
            .map(char::from)
            .collect();

        dict.set(key.clone(), i)
            .with_context(|| format!("bulk insert #{i}"))?;

        if delete_every > 0 && i % delete_every == 0 && dict.delete(&key).is_some() {
            deleted += 1;
        }

        if i > 0 && i % 10_000 == 0 {
            debug!(inserted = i, stats = ?dict.stats(), "bulk progress");
        }
    }

    let elapsed = start.elapsed();
    let stats = dict.stats();

    info!(
        count,
        deleted,
        len = stats.len,
        elapsed_ms = elapsed.as_millis() as u64,
        "bulk load finished"
    );
    println!("inserted:          {count}");
    println!("deleted:           {deleted}");
    println!("len:               {}", stats.len);
    println!("primary capacity:  {}", stats.primary_capacity);
    println!("target capacity:   {}", stats.target_capacity);
    println!("rehashing:         {}", dict.is_rehashing());
    println!("elapsed:           {elapsed:?}");

    Ok(())
}

fn report(err: &StackError) {
    match err.log_level() {
        LogLevel::Error => {
            error!(code = %err.status_code(), critical = err.is_critical(), error = %err, "command failed")
        }
        LogLevel::Warn => warn!(code = %err.status_code(), error = %err, "command failed"),
        _ => info!(code = %err.status_code(), error = %err, "command failed"),
    }
}
