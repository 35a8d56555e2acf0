pub mod concurrent;
pub mod dict_base;
pub mod entry;
pub mod hasher;
pub mod table;

pub use concurrent::{ContentionMetrics, ContentionSnapshot, SharedDict};
pub use dict_base::{Dict, DictIter, DictStats};
pub use entry::DictEntry;
pub use hasher::{split_key, DictHasher, Sip24Hasher, HASH_KEY_LEN};
pub use table::{next_power, INITIAL_SIZE, MAX_CAPACITY};
