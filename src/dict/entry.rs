/// Голова цепочки коллизий: пустой бакет или первый узел.
pub(crate) type Chain<K, V> = Option<Box<DictEntry<K, V>>>;

/// Один элемент в цепочке коллизий.
///
/// Новые узлы всегда встают в начало цепочки, поэтому среди ключей одного
/// бакета сохраняется только обратный порядок вставки.
#[derive(Debug)]
pub struct DictEntry<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) next: Chain<K, V>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> DictEntry<K, V> {
    /// Создаёт новый элемент цепочки.
    pub(crate) fn new(
        key: K,
        val: V,
        next: Chain<K, V>,
    ) -> Box<Self> {
        Box::new(DictEntry { key, val, next })
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.val
    }

    /// Разбирает отцепленный узел на ключ и значение.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.val)
    }
}

/// Ищет узел с ключом `key`, проходя цепочку от головы.
pub(crate) fn find<'a, K, V, Q>(
    head: &'a Chain<K, V>,
    key: &Q,
) -> Option<&'a DictEntry<K, V>>
where
    K: AsRef<[u8]>,
    Q: AsRef<[u8]> + ?Sized,
{
    let key = key.as_ref();
    let mut cur = head.as_deref();

    while let Some(e) = cur {
        if e.key.as_ref() == key {
            return Some(e);
        }
        cur = e.next.as_deref();
    }

    None
}

/// Изменяемый вариант [`find`].
pub(crate) fn find_mut<'a, K, V, Q>(
    head: &'a mut Chain<K, V>,
    key: &Q,
) -> Option<&'a mut DictEntry<K, V>>
where
    K: AsRef<[u8]>,
    Q: AsRef<[u8]> + ?Sized,
{
    let key = key.as_ref();
    let mut cur = head.as_deref_mut();

    while let Some(e) = cur {
        if e.key.as_ref() == key {
            return Some(e);
        }
        cur = e.next.as_deref_mut();
    }

    None
}

/// Отцепляет первый узел с ключом `key`: предшественник (или голова бакета)
/// начинает указывать на его хвост. Возвращает отцепленный узел.
pub(crate) fn unlink<K, V, Q>(
    head: &mut Chain<K, V>,
    key: &Q,
) -> Option<Box<DictEntry<K, V>>>
where
    K: AsRef<[u8]>,
    Q: AsRef<[u8]> + ?Sized,
{
    let key = key.as_ref();
    let mut cur = head;

    loop {
        match cur {
            None => return None,
            Some(node) if node.key.as_ref() == key => {
                let tail = node.next.take();
                return std::mem::replace(cur, tail);
            }
            Some(node) => {
                cur = &mut node.next;
            }
        }
    }
}

/// Длина цепочки.
pub(crate) fn chain_len<K, V>(head: &Chain<K, V>) -> usize {
    let mut len = 0;
    let mut cur = head.as_deref();

    while let Some(e) = cur {
        len += 1;
        cur = e.next.as_deref();
    }

    len
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
