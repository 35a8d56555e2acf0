use std::{fmt, hash::Hasher};

use rand::{rngs::OsRng, CryptoRng, RngCore};
use siphasher::sip::SipHasher24;

/// Размер ключа хешера в байтах.
pub const HASH_KEY_LEN: usize = 16;

/// Хеш-функция, определяющая размещение ключей по бакетам.
///
/// Реализация обязана быть детерминированной для одного экземпляра: ключ
/// хешера не меняется, пока словарь жив, иначе существующие записи окажутся
/// в "чужих" бакетах.
pub trait DictHasher {
    /// 64-битный дайджест произвольной последовательности байт.
    fn digest(
        &self,
        message: &[u8],
    ) -> u64;

    fn name(&self) -> &'static str;
}

/// SipHash-2-4 с секретным 128-битным ключом.
///
/// Ключ генерируется один раз при создании экземпляра, так что два словаря
/// в одном процессе раскладывают одни и те же ключи по-разному.
#[derive(Clone)]
pub struct Sip24Hasher {
    key0: u64,
    key1: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Sip24Hasher {
    /// Хешер со случайным ключом из криптографического ГСЧ ОС.
    pub fn new() -> Self {
        Self::from_rng(&mut OsRng)
    }

    /// Хешер с ключом из переданного криптографического ГСЧ.
    pub fn from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut key = [0u8; HASH_KEY_LEN];
        rng.fill_bytes(&mut key);
        Self::from_key(key)
    }

    /// Хешер с фиксированным ключом. Нужен для воспроизводимых тестов и
    /// проверки по эталонным векторам.
    pub fn from_key(key: [u8; HASH_KEY_LEN]) -> Self {
        let (key0, key1) = split_key(&key);
        Self { key0, key1 }
    }
}

/// Делит 16 байт ключа на два little-endian слова.
pub fn split_key(key: &[u8; HASH_KEY_LEN]) -> (u64, u64) {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&key[..8]);
    hi.copy_from_slice(&key[8..]);
    (u64::from_le_bytes(lo), u64::from_le_bytes(hi))
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Sip24Hasher
////////////////////////////////////////////////////////////////////////////////

impl DictHasher for Sip24Hasher {
    #[inline]
    fn digest(
        &self,
        message: &[u8],
    ) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(self.key0, self.key1);
        hasher.write(message);
        hasher.finish()
    }

    fn name(&self) -> &'static str {
        "SipHash-2-4"
    }
}

impl Default for Sip24Hasher {
    fn default() -> Self {
        Self::new()
    }
}

// Ключ в логи не попадает.
impl fmt::Debug for Sip24Hasher {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Sip24Hasher").finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
