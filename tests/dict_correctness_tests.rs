use std::collections::HashMap;

use sipdict::{Dict, DictConfig, HASH_KEY_LEN};

use generators::{random_strings, sequential_keys};

#[test]
fn test_get_immutable_multiple_borrows() {
    let mut d = Dict::new();

    d.set("x", 10u32).unwrap();
    d.set("y", 20u32).unwrap();
    d.set("z", 30u32).unwrap();

    // Все три ссылки живут одновременно - невозможно с &mut self
    let vx = d.get("x").unwrap();
    let vy = d.get("y").unwrap();
    let vz = d.get("z").unwrap();

    assert_eq!(*vx + *vy + *vz, 60);
}

#[test]
fn test_round_trip_and_overwrite() {
    let mut d = Dict::new();

    d.set("key1".to_string(), "value1".to_string()).unwrap();
    d.set("key2".to_string(), "value2".to_string()).unwrap();
    assert_eq!(d.get("key1").map(String::as_str), Some("value1"));

    d.set("key2".to_string(), "updated_value2".to_string()).unwrap();
    assert_eq!(d.get("key2").map(String::as_str), Some("updated_value2"));
    assert_eq!(d.len(), 2);
}

/// Тест проверяет, что удаление идемпотентно: второй вызов возвращает
/// `None`, остальные ключи не затронуты.
#[test]
fn test_delete_is_idempotent() {
    let mut d = Dict::new();
    d.set("a".to_string(), 1).unwrap();
    d.set("b".to_string(), 2).unwrap();

    assert_eq!(d.delete("a").map(|(_, v)| v), Some(1));
    assert_eq!(d.delete("a"), None);
    assert_eq!(d.get("b"), Some(&2));
    assert_eq!(d.len(), 1);
}

/// Тест проверяет, что пустой ключ и пустое значение допустимы.
#[test]
fn test_empty_key_and_value() {
    let mut d: Dict<Vec<u8>, Vec<u8>> = Dict::new();

    d.set(Vec::new(), Vec::new()).unwrap();
    d.set(b"k".to_vec(), Vec::new()).unwrap();

    assert_eq!(d.get(b"".as_slice()), Some(&Vec::new()));
    assert_eq!(d.get(b"k".as_slice()), Some(&Vec::new()));
    assert_eq!(d.get(b"missing".as_slice()), None);
}

/// Тест проверяет, что ключи сравниваются побайтово, в том числе
/// не-UTF-8 и с нулевыми байтами.
#[test]
fn test_binary_keys() {
    let mut d = Dict::new();
    let a: Vec<u8> = vec![0xff, 0x00, 0xfe];
    let b: Vec<u8> = vec![0xff, 0x00, 0xfe, 0x00];

    d.set(a.clone(), "a").unwrap();
    d.set(b.clone(), "b").unwrap();

    assert_eq!(d.get(&a), Some(&"a"));
    assert_eq!(d.get(&b), Some(&"b"));
    assert_eq!(d.len(), 2);
}

/// Тест проверяет, что миграция незаметна снаружи: после каждой вставки
/// все ранее вставленные ключи читаются.
#[test]
fn test_migration_is_transparent() {
    let keys = sequential_keys("k", 10_000);
    let mut d = Dict::new();

    for (i, key) in keys.iter().enumerate() {
        d.set(key.clone(), i).unwrap();
        assert_eq!(d.len(), i + 1);

        if i % 97 == 0 || (d.is_rehashing() && i % 13 == 0) {
            for (j, prev) in keys[..=i].iter().enumerate() {
                assert_eq!(d.get(prev.as_str()), Some(&j), "lost {prev} at step {i}");
            }
        }
    }

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(d.get(key.as_str()), Some(&i));
    }
}

/// Тест проверяет, что словарь всегда совпадает с эталонным `HashMap` на
/// смешанной последовательности вставок и удалений.
#[test]
fn test_mixed_workload_matches_hashmap() {
    let keys = random_strings(42, 5_000, 6);
    let mut d = Dict::new();
    let mut model = HashMap::new();

    for (i, key) in keys.iter().enumerate() {
        if i % 3 == 2 {
            let victim = &keys[i / 2];
            assert_eq!(
                d.delete(victim.as_str()).map(|(_, v)| v),
                model.remove(victim),
                "delete {victim}"
            );
        } else {
            d.set(key.clone(), i).unwrap();
            model.insert(key.clone(), i);
        }
        assert_eq!(d.len(), model.len());
    }

    let items = d.get_all_items();
    assert_eq!(items.len(), model.len());
    for (k, v) in &model {
        assert_eq!(items.get(k), Some(&v));
    }
}

/// Тест проверяет, что рост не начинается до заполнения таблицы, а
/// ёмкость остаётся степенью двойки.
#[test]
fn test_growth_thresholds() {
    let mut d = Dict::new();

    for i in 0..4u32 {
        d.set(i.to_string(), i).unwrap();
    }
    let stats = d.stats();
    assert_eq!(stats.primary_capacity, 4);
    assert_eq!(stats.rehash_cursor, None);

    d.set("4".to_string(), 4).unwrap();
    let stats = d.stats();
    assert_eq!(stats.target_capacity, 8);
    assert_eq!(stats.len, 5);
}

/// Тест проверяет, что после удаления всех ключей словарь пуст и снова
/// принимает вставки.
#[test]
fn test_drain_and_reuse() {
    let keys = sequential_keys("drain", 1_000);
    let mut d = Dict::new();

    for key in &keys {
        d.set(key.clone(), ()).unwrap();
    }
    for key in &keys {
        assert!(d.delete(key.as_str()).is_some());
    }

    assert!(d.is_empty());
    assert!(d.get_all_items().is_empty());
    assert_eq!(d.iter().count(), 0);

    d.set("again".to_string(), ()).unwrap();
    assert!(d.contains_key("again"));
    assert_eq!(d.len(), 1);
}

/// Тест проверяет, что увеличенный бюджет шагов не меняет наблюдаемое
/// поведение.
#[test]
fn test_custom_config_behaves_the_same() {
    let config = DictConfig {
        initial_size: 64,
        rehash_steps: 8,
        empty_visits_factor: 2,
    };
    let mut d = Dict::with_config(config).unwrap();
    let mut model = HashMap::new();

    for (i, key) in random_strings(7, 3_000, 10).into_iter().enumerate() {
        d.set(key.clone(), i).unwrap();
        model.insert(key, i);
    }

    assert_eq!(d.len(), model.len());
    for (k, v) in &model {
        assert_eq!(d.get(k.as_str()), Some(v));
    }
    assert!(d.stats().primary_capacity >= 64);
}

/// Тест проверяет, что два словаря с одним ключом хеширования строят
/// одинаковую раскладку, а порядок итерации не зависит от чтений.
#[test]
fn test_fixed_key_layout() {
    let key = [9u8; HASH_KEY_LEN];
    let mut a = Dict::with_key(key);
    let mut b = Dict::with_key(key);

    for k in sequential_keys("layout", 200) {
        a.set(k.clone(), 0u8).unwrap();
        b.set(k, 0u8).unwrap();
    }
    let _ = b.get("layout:3");

    let order_a: Vec<_> = a.iter().map(|(k, _)| k.clone()).collect();
    let order_b: Vec<_> = b.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(order_a, order_b);
    assert_eq!(a.stats(), b.stats());
}
