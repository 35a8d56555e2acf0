use super::entry::Chain;

/// Минимальная ёмкость таблицы при первой аллокации.
pub const INITIAL_SIZE: usize = 4;

/// Потолок ёмкости таблицы в бакетах. Запрос роста сверх него завершается
/// ошибкой, а не переполнением.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// Одна хеш-таблица: вектор бакетов, маска размера и количество занятых
/// элементов.
///
/// Политики роста здесь нет: таблицей целиком управляет `Dict`.
#[derive(Debug)]
pub(crate) struct HashTable<K, V> {
    pub(crate) buckets: Vec<Chain<K, V>>,
    size_mask: usize,
    pub(crate) used: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> HashTable<K, V> {
    /// Создаёт таблицу ровно на `capacity` пустых бакетов.
    ///
    /// `0` означает неинициализированную таблицу.
    ///
    /// # Panics
    ///
    /// Если `capacity` не ноль и не степень двойки. Такие значения приходят
    /// только из ошибки в коде словаря, а не из пользовательского ввода.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(
            capacity == 0 || capacity.is_power_of_two(),
            "hash table capacity must be zero or a power of two, got {capacity}"
        );

        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || None);

        HashTable {
            buckets,
            size_mask: capacity.saturating_sub(1),
            used: 0,
        }
    }

    /// Возвращает `true`, если таблица не инициализирована (нет бакетов).
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub(crate) fn bucket_index(
        &self,
        hash: u64,
    ) -> usize {
        (hash as usize) & self.size_mask
    }
}

/// Ближайшая степень двойки `>= size`, не меньше [`INITIAL_SIZE`].
///
/// `None`, если результат превысил бы [`MAX_CAPACITY`].
pub fn next_power(size: usize) -> Option<usize> {
    next_power_with_floor(size, INITIAL_SIZE)
}

/// Как [`next_power`], но с явным нижним порогом `floor` (степень двойки).
pub fn next_power_with_floor(
    size: usize,
    floor: usize,
) -> Option<usize> {
    if size <= floor {
        return Some(floor);
    }

    size.checked_next_power_of_two()
        .filter(|&cap| cap <= MAX_CAPACITY)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
