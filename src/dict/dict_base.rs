use std::{collections::HashMap, hash::Hash};

use sipdict_error::{DictError, DictResult};
use tracing::{debug, error, trace};

use super::{
    entry::{self, DictEntry},
    hasher::{DictHasher, Sip24Hasher, HASH_KEY_LEN},
    table::{self, HashTable, MAX_CAPACITY},
};
use crate::config::DictConfig;

/// Хеш-таблица с инкрементальным рехешированием.
///
/// **ИНВАРИАНТЫ:**
///
/// - Если `rehash_idx == None`:
///     - ht[1] пуста и не аллоцирована
///     - все элементы находятся в ht[0]
///
/// - Если `rehash_idx == Some(i)`:
///     - рехеширование в процессе, бакеты ht[0] с индексом `< i` пусты
///     - каждый живой ключ лежит ровно в одной из двух таблиц
///
/// - Общее количество элементов всегда равно `ht[0].used + ht[1].used`.
///
/// Рехеширование продвигается только мутирующими операциями (`set`,
/// `delete`). Чтение (`get`, `get_mut`, `iter`) состояние миграции не
/// меняет, поэтому словарь, в который перестали писать, может навсегда
/// остаться наполовину перенесённым.
///
/// Ключи бинарно-безопасны: используется любое `K: AsRef<[u8]>`, а поиск
/// принимает любое `Q: AsRef<[u8]>`, так что `Dict<String, _>` можно
/// опрашивать через `&str`, а `Dict<Vec<u8>, _>` через `&[u8]`.
#[derive(Debug)]
pub struct Dict<K, V, H = Sip24Hasher> {
    ht: [HashTable<K, V>; 2],
    rehash_idx: Option<usize>,
    hasher: H,
    config: DictConfig,
}

/// Снимок внутреннего состояния словаря.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictStats {
    pub len: usize,
    pub primary_capacity: usize,
    pub primary_used: usize,
    pub target_capacity: usize,
    pub target_used: usize,
    /// `None`, если миграция не идёт.
    pub rehash_cursor: Option<usize>,
}

/// Итератор по словарю `Dict` (разделяемая ссылка).
pub struct DictIter<'a, K, V> {
    tables: [&'a HashTable<K, V>; 2],
    table_idx: usize,
    bucket_idx: usize,
    current_entry: Option<&'a DictEntry<K, V>>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Dict<K, V, Sip24Hasher> {
    /// Создаёт новый пустой словарь со случайным ключом хеширования.
    pub fn new() -> Self {
        Self::with_hasher(Sip24Hasher::new())
    }

    /// Словарь с фиксированным ключом хеширования (воспроизводимые тесты).
    pub fn with_key(key: [u8; HASH_KEY_LEN]) -> Self {
        Self::with_hasher(Sip24Hasher::from_key(key))
    }

    /// Словарь со случайным ключом и пользовательскими параметрами роста.
    pub fn with_config(config: DictConfig) -> DictResult<Self> {
        Self::with_hasher_and_config(Sip24Hasher::new(), config)
    }
}

impl<K, V, H> Dict<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Dict {
            ht: [HashTable::new(0), HashTable::new(0)],
            rehash_idx: None,
            hasher,
            config: DictConfig::default(),
        }
    }

    pub fn with_hasher_and_config(
        hasher: H,
        config: DictConfig,
    ) -> DictResult<Self> {
        config.validate()?;

        Ok(Dict {
            ht: [HashTable::new(0), HashTable::new(0)],
            rehash_idx: None,
            hasher,
            config,
        })
    }

    /// Возвращает общее количество элементов во всех таблицах.
    pub fn len(&self) -> usize {
        self.ht[0].used() + self.ht[1].used()
    }

    /// Возвращает `true`, если словарь пуст.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Возвращает true, если идёт рехеширование.
    #[inline]
    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx.is_some()
    }

    pub fn stats(&self) -> DictStats {
        DictStats {
            len: self.len(),
            primary_capacity: self.ht[0].capacity(),
            primary_used: self.ht[0].used(),
            target_capacity: self.ht[1].capacity(),
            target_used: self.ht[1].used(),
            rehash_cursor: self.rehash_idx,
        }
    }

    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Возвращает итератор по парам `(&K, &V)` в обеих таблицах. Порядок не
    /// определён.
    pub fn iter(&self) -> DictIter<'_, K, V> {
        DictIter {
            tables: [&self.ht[0], &self.ht[1]],
            table_idx: 0,
            bucket_idx: 0,
            current_entry: None,
        }
    }

    /// Снимок всех живых пар ключ–значение. Значения не копируются.
    pub fn get_all_items(&self) -> HashMap<&K, &V>
    where
        K: Hash + Eq,
    {
        self.iter().collect()
    }
}

impl<K, V, H> Dict<K, V, H>
where
    K: AsRef<[u8]>,
    H: DictHasher,
{
    /// Возвращает `Some(&V)` для указанного ключа или `None`.
    pub fn get<Q>(
        &self,
        key: &Q,
    ) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let hash = self.hasher.digest(key.as_ref());

        self.find_entry(hash, key).map(DictEntry::value)
    }

    /// Возвращает `Some(&mut V)` для указанного ключа или `None`.
    ///
    /// Как и `get`, миграцию не продвигает.
    pub fn get_mut<Q>(
        &mut self,
        key: &Q,
    ) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let hash = self.hasher.digest(key.as_ref());
        let (table_idx, slot) = self.locate(hash, key)?;

        entry::find_mut(&mut self.ht[table_idx].buckets[slot], key).map(|e| &mut e.val)
    }

    pub fn contains_key<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Записывает пару `(key, val)`.
    ///
    /// Существующее значение перезаписывается на месте, новый ключ
    /// вставляется в голову цепочки текущей таблицы (`ht[1]` во время
    /// миграции). Перед вставкой может начаться рост и выполняется один шаг
    /// рехеширования.
    pub fn set(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<()> {
        let hash = self.hasher.digest(key.as_ref());

        if let Some((table_idx, slot)) = self.locate(hash, &key) {
            if let Some(e) = entry::find_mut(&mut self.ht[table_idx].buckets[slot], &key) {
                e.val = val;
                return Ok(());
            }
        }

        self.expand_if_needed()?;

        if self.is_rehashing() {
            self.rehash_step();
        }

        self.insert_new(hash, key, val)
    }

    /// Удаляет ключ. Возвращает удалённую пару или `None`, если ключа не было.
    pub fn delete<Q>(
        &mut self,
        key: &Q,
    ) -> Option<(K, V)>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        if self.is_rehashing() {
            self.rehash_step();
        }

        let hash = self.hasher.digest(key.as_ref());
        let rehashing = self.is_rehashing();

        for table in self.ht.iter_mut() {
            if table.is_empty() {
                continue;
            }

            let slot = table.bucket_index(hash);

            if let Some(node) = entry::unlink(&mut table.buckets[slot], key) {
                table.used -= 1;
                return Some(node.into_parts());
            }

            // Без рехеширования ключ может быть только в ht[0].
            if !rehashing {
                break;
            }
        }

        None
    }

    /// Ищет узел по уже посчитанному хешу в актуальных таблицах.
    fn find_entry<Q>(
        &self,
        hash: u64,
        key: &Q,
    ) -> Option<&DictEntry<K, V>>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        for table in &self.ht {
            if table.is_empty() {
                continue;
            }

            let slot = table.bucket_index(hash);

            if let Some(e) = entry::find(&table.buckets[slot], key) {
                return Some(e);
            }

            if !self.is_rehashing() {
                break;
            }
        }

        None
    }

    /// Возвращает `(таблица, бакет)`, где лежит ключ.
    fn locate<Q>(
        &self,
        hash: u64,
        key: &Q,
    ) -> Option<(usize, usize)>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        for (table_idx, table) in self.ht.iter().enumerate() {
            if table.is_empty() {
                continue;
            }

            let slot = table.bucket_index(hash);

            if entry::find(&table.buckets[slot], key).is_some() {
                return Some((table_idx, slot));
            }

            if !self.is_rehashing() {
                break;
            }
        }

        None
    }

    /// Вставляет ключ, которого по результатам поиска нет, в голову цепочки
    /// текущей таблицы.
    fn insert_new(
        &mut self,
        hash: u64,
        key: K,
        val: V,
    ) -> DictResult<()> {
        let table_idx = if self.is_rehashing() { 1 } else { 0 };
        let table = &mut self.ht[table_idx];
        let slot = table.bucket_index(hash);

        if entry::find(&table.buckets[slot], &key).is_some() {
            let err = DictError::invariant_violation(key.as_ref());
            error!(table = table_idx, slot, error = %err, "duplicate key found on insert");
            return Err(err);
        }

        let next = table.buckets[slot].take();

        table.buckets[slot] = Some(DictEntry::new(key, val, next));
        table.used += 1;

        Ok(())
    }

    /// Выполняет `rehash_steps` шагов инкрементного рехеширования.
    fn rehash_step(&mut self) {
        let steps = self.config.rehash_steps;
        self.rehash(steps);
    }

    /// Переносит до `steps` непустых бакетов из ht[0] в ht[1].
    ///
    /// Пропуск пустых бакетов ограничен `steps * empty_visits_factor`
    /// посещениями: при исчерпании бюджета курсор сохраняется и работа
    /// продолжится при следующем вызове. Возвращает `true`, если миграция
    /// ещё не завершена.
    fn rehash(
        &mut self,
        steps: usize,
    ) -> bool {
        let Some(mut idx) = self.rehash_idx else {
            return false;
        };

        let mut empty_visits = steps.saturating_mul(self.config.empty_visits_factor);
        let mut remaining = steps;

        while remaining > 0 && self.ht[0].used() != 0 {
            remaining -= 1;

            // Бакеты ниже курсора уже пусты, поэтому при used > 0 непустой
            // бакет найдётся не раньше idx и не дальше конца таблицы.
            while self.ht[0].buckets[idx].is_none() {
                idx += 1;
                empty_visits -= 1;

                if empty_visits == 0 {
                    trace!(cursor = idx, "rehash empty bucket budget exhausted");
                    self.rehash_idx = Some(idx);
                    return true;
                }
            }

            // Переносим всю цепочку бакета idx из ht[0] в ht[1].
            let mut moved = 0usize;
            let mut entry_opt = self.ht[0].buckets[idx].take();

            while let Some(mut e) = entry_opt {
                entry_opt = e.next.take();

                let slot = self.ht[1].bucket_index(self.hasher.digest(e.key.as_ref()));

                e.next = self.ht[1].buckets[slot].take();

                self.ht[1].buckets[slot] = Some(e);
                self.ht[0].used -= 1;
                self.ht[1].used += 1;
                moved += 1;
            }

            idx += 1;
            trace!(
                cursor = idx,
                moved,
                remaining = self.ht[0].used(),
                "rehash step"
            );
        }

        if self.ht[0].used() == 0 {
            // Все бакеты перенесены - финализируем рехеширование.
            self.ht[0] = std::mem::replace(&mut self.ht[1], HashTable::new(0));
            self.rehash_idx = None;
            debug!(
                capacity = self.ht[0].capacity(),
                used = self.ht[0].used(),
                "incremental rehash finished"
            );
            return false;
        }

        self.rehash_idx = Some(idx);
        true
    }

    /// Аллоцирует ht[0] при первой вставке или начинает рост при load
    /// factor ≥ 1.
    fn expand_if_needed(&mut self) -> DictResult<()> {
        if self.is_rehashing() {
            return Ok(());
        }

        let size = self.ht[0].capacity();
        let used = self.ht[0].used();

        if size == 0 {
            self.expand(self.config.initial_size)
        } else if used >= size {
            self.expand(used.saturating_mul(2))
        } else {
            Ok(())
        }
    }

    /// Запрашивает ёмкость не меньше `requested`.
    ///
    /// Пустая ht[0] аллоцируется сразу, иначе аллоцируется ht[1] и
    /// начинается миграция. Никогда не уменьшает таблицу.
    fn expand(
        &mut self,
        requested: usize,
    ) -> DictResult<()> {
        if self.is_rehashing() || self.ht[0].used() > requested {
            return Ok(());
        }

        let actual = table::next_power_with_floor(requested, self.config.initial_size).ok_or(
            DictError::CapacityOverflow {
                requested,
                max: MAX_CAPACITY,
            },
        )?;

        if actual <= self.ht[0].capacity() {
            return Ok(());
        }

        if self.ht[0].is_empty() {
            debug!(capacity = actual, "allocating primary table");
            self.ht[0] = HashTable::new(actual);
            return Ok(());
        }

        debug!(
            from = self.ht[0].capacity(),
            to = actual,
            used = self.ht[0].used(),
            "starting incremental rehash"
        );
        self.ht[1] = HashTable::new(actual);
        self.rehash_idx = Some(0);

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Dict, DictIter
////////////////////////////////////////////////////////////////////////////////

impl<'a, K, V> Iterator for DictIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Отдаём текущий элемент цепочки, если он есть.
            if let Some(entry) = self.current_entry.take() {
                self.current_entry = entry.next.as_deref();
                return Some((&entry.key, &entry.val));
            }

            // Бакеты текущей таблицы исчерпаны.
            if self.bucket_idx >= self.tables[self.table_idx].buckets.len() {
                // Переходим к ht[1], если она непуста (идёт рехеширование).
                if self.table_idx == 0 && !self.tables[1].is_empty() {
                    self.table_idx = 1;
                    self.bucket_idx = 0;
                    continue;
                }
                return None;
            }

            self.current_entry = self.tables[self.table_idx].buckets[self.bucket_idx].as_deref();
            self.bucket_idx += 1;
        }
    }
}

impl<'a, K, V, H> IntoIterator for &'a Dict<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = DictIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Default for Dict<K, V, Sip24Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
