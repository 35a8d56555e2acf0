use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Instant,
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use sipdict_error::DictResult;

use super::{
    dict_base::{Dict, DictStats},
    hasher::{DictHasher, Sip24Hasher},
};
use crate::config::DictConfig;

/// Потокобезопасная обёртка над [`Dict`]: один reader/writer lock на весь
/// словарь.
///
/// `get`, `get_all_items` и `stats` берут разделяемую блокировку, `set` и
/// `delete` эксклюзивную. Клоны разделяют один и тот же словарь.
#[derive(Debug)]
pub struct SharedDict<K, V, H = Sip24Hasher> {
    inner: Arc<RwLock<Dict<K, V, H>>>,
    metrics: Arc<ContentionMetrics>,
}

#[derive(Debug, Default)]
pub struct ContentionMetrics {
    pub read_locks: AtomicUsize,
    pub write_locks: AtomicUsize,
    pub total_wait_time_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionSnapshot {
    pub read_locks: usize,
    pub write_locks: usize,
    pub total_wait_time_ns: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> SharedDict<K, V, Sip24Hasher> {
    pub fn new() -> Self {
        Self::from_dict(Dict::new())
    }

    pub fn with_config(config: DictConfig) -> DictResult<Self> {
        Ok(Self::from_dict(Dict::with_config(config)?))
    }
}

impl<K, V, H> SharedDict<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_dict(Dict::with_hasher(hasher))
    }

    /// Оборачивает уже построенный словарь.
    pub fn from_dict(dict: Dict<K, V, H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dict)),
            metrics: Arc::new(ContentionMetrics::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> DictStats {
        self.read_guard().stats()
    }

    /// Снимок всех пар. Ключи и значения копируются, пока держится
    /// разделяемая блокировка.
    pub fn get_all_items(&self) -> HashMap<K, V>
    where
        K: Clone + Hash + Eq,
        V: Clone,
    {
        self.read_guard()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Выполняет `f` под разделяемой блокировкой.
    pub fn read<R>(
        &self,
        f: impl FnOnce(&Dict<K, V, H>) -> R,
    ) -> R {
        f(&self.read_guard())
    }

    /// Выполняет `f` под эксклюзивной блокировкой: несколько операций
    /// выполняются атомарно относительно других потоков.
    pub fn write<R>(
        &self,
        f: impl FnOnce(&mut Dict<K, V, H>) -> R,
    ) -> R {
        f(&mut self.write_guard())
    }

    pub fn contention(&self) -> ContentionSnapshot {
        self.metrics.snapshot()
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Dict<K, V, H>> {
        let start = Instant::now();
        let guard = self.inner.read();
        self.metrics.inc_read(start.elapsed().as_nanos() as u64);
        guard
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Dict<K, V, H>> {
        let start = Instant::now();
        let guard = self.inner.write();
        self.metrics.inc_write(start.elapsed().as_nanos() as u64);
        guard
    }
}

impl<K, V, H> SharedDict<K, V, H>
where
    K: AsRef<[u8]>,
    H: DictHasher,
{
    /// Возвращает копию значения.
    pub fn get<Q>(
        &self,
        key: &Q,
    ) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
        V: Clone,
    {
        self.read_guard().get(key).cloned()
    }

    /// Даёт доступ к значению без копирования, пока держится разделяемая
    /// блокировка.
    pub fn get_with<Q, R>(
        &self,
        key: &Q,
        f: impl FnOnce(&V) -> R,
    ) -> Option<R>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.read_guard().get(key).map(f)
    }

    pub fn contains_key<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.read_guard().contains_key(key)
    }

    pub fn set(
        &self,
        key: K,
        val: V,
    ) -> DictResult<()> {
        self.write_guard().set(key, val)
    }

    /// Удаляет ключ и возвращает его значение.
    pub fn delete<Q>(
        &self,
        key: &Q,
    ) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.write_guard().delete(key).map(|(_, v)| v)
    }
}

impl ContentionMetrics {
    fn inc_read(
        &self,
        wait_ns: u64,
    ) {
        self.read_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns.fetch_add(wait_ns, Ordering::Relaxed);
    }

    fn inc_write(
        &self,
        wait_ns: u64,
    ) {
        self.write_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns.fetch_add(wait_ns, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            read_locks: self.read_locks.load(Ordering::Relaxed),
            write_locks: self.write_locks.load(Ordering::Relaxed),
            total_wait_time_ns: self.total_wait_time_ns.load(Ordering::Relaxed),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для SharedDict
////////////////////////////////////////////////////////////////////////////////

impl<K, V, H> Clone for SharedDict<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<K, V> Default for SharedDict<K, V, Sip24Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
