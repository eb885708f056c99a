extern crate nested_collections;
extern crate rand;

use nested_collections::nested_map::{Lookup, Nested, NestedMap, Section, Value};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn section(entries: Vec<(&'static str, Nested<&'static str, u32>)>) -> Section<&'static str, u32> {
    entries.into_iter().collect()
}

fn config() -> Section<&'static str, u32> {
    section(vec![
        ("loglevel", Nested::Value(10)),
        (
            "Network",
            Nested::Section(section(vec![
                ("loglevel", Nested::Value(20)),
                ("port", Nested::Value(80)),
                (
                    "Proxy",
                    Nested::Section(section(vec![
                        ("port", Nested::Value(3128)),
                        ("hosts", Nested::Section(Section::new())),
                    ])),
                ),
            ])),
        ),
        ("timeout", Nested::Value(30)),
    ])
}

#[test]
fn int_test_find_latest_value() {
    let mut map = NestedMap::new();
    map.add("port", 80, vec![0], vec![]);
    map.add("port", 8080, vec![0, 0], vec!["http"]);
    map.add("port", 8081, vec![0, 0], vec!["http"]);
    map.add("port", 81, vec![0], vec![]);

    assert_eq!(map.len(), 2);
    assert_eq!(map.find(&"port", Lookup::Path(&[])), Ok(&Value::Leaf(81)));
    assert_eq!(map.find(&"port", Lookup::Path(&["http"])), Ok(&Value::Leaf(8081)));
}

#[test]
fn int_test_len_after_removals() {
    let mut map = NestedMap::new();
    for i in 0..20u32 {
        map.add(i, i, vec![i as usize], vec![]);
    }
    for i in 0..7u32 {
        map.remove(&i, Lookup::Unique).unwrap();
    }
    assert_eq!(map.len(), 13);
    assert_eq!(map.node_count(), 13);
}

#[test]
fn int_test_mapping_round_trip() {
    let config = config();
    let mut map = NestedMap::with_name("config");
    map.add_mapping(&config);

    assert_eq!(map.len(), 8);
    assert_eq!(map.dump(), &config);
    assert_eq!(NestedMap::from(config.clone()).dump(), &config);
}

#[test]
fn int_test_ambiguity() {
    let mut map = NestedMap::with_name("log");
    map.add("loglevel", "DEBUG", vec![0], vec![]);
    map.add("loglevel", "INFO", vec![0], vec!["Network"]);

    let err = map.find(&"loglevel", Lookup::Unique).unwrap_err();
    assert!(err.is_ambiguous());
    assert_eq!(err.candidates(), &["[]".to_string(), "[\"Network\"]".to_string()]);
    assert!(err.to_string().starts_with("NestedMap 'log':"));
    assert_eq!(map.find(&"loglevel", Lookup::Ancestor(&"Network")), Ok(&Value::Leaf("INFO")));
    assert_eq!(map.find(&"loglevel", Lookup::Path(&[])), Ok(&Value::Leaf("DEBUG")));
    assert_eq!(map.find(&"loglevel", Lookup::parent(Some(&"Network"), true)), Ok(&Value::Leaf("INFO")));
}

#[test]
fn int_test_union_of_disjoint_maps() {
    let a = section(vec![
        ("a", Nested::Value(1)),
        ("net", Nested::Section(section(vec![("port", Nested::Value(80))]))),
    ]);
    let b = section(vec![
        ("b", Nested::Value(2)),
        ("log", Nested::Section(section(vec![("level", Nested::Value(3))]))),
    ]);
    let left = NestedMap::from(a.clone());
    let right = NestedMap::from(b.clone());

    let union = &left | &right;
    let mut expected = a.clone();
    expected.extend(b.clone());
    assert_eq!(union.dump(), &expected);
    assert_eq!(union.name(), "-union");
    assert_eq!(union.len(), left.len() + right.len());

    let mut merged = left.clone();
    merged |= &right;
    assert_eq!(merged.dump(), &expected);

    let mut loaded = NestedMap::from(a);
    loaded |= b;
    assert_eq!(loaded.dump(), &expected);
}

#[test]
fn int_test_union_merges_sections() {
    let mut left = NestedMap::with_name("left");
    left.add_mapping(&section(vec![(
        "net",
        Nested::Section(section(vec![("port", Nested::Value(80))])),
    )]));
    let mut right = NestedMap::with_name("right");
    right.add_mapping(&section(vec![(
        "net",
        Nested::Section(section(vec![("host", Nested::Value(1)), ("port", Nested::Value(81))])),
    )]));

    let union = &left | &right;
    assert_eq!(union.name(), "left-union");
    assert_eq!(
        union.dump(),
        &section(vec![(
            "net",
            Nested::Section(section(vec![("port", Nested::Value(81)), ("host", Nested::Value(1))])),
        )]),
    );
}

#[test]
fn int_test_remove_last_record() {
    let mut map = NestedMap::new();
    map.add("port", 80, vec![0], vec!["http"]);
    map.add("port", 22, vec![0], vec!["ssh"]);

    map.remove(&"port", Lookup::Immediate(&"http")).unwrap();
    assert_eq!(map.find(&"port", Lookup::Unique), Ok(&Value::Leaf(22)));
    map.remove(&"port", Lookup::Unique).unwrap();
    assert!(map.find(&"port", Lookup::Unique).unwrap_err().is_key_not_found());
    assert!(map.remove(&"port", Lookup::Unique).unwrap_err().is_key_not_found());
    assert!(map.is_empty());
}

#[test]
fn int_test_remove_then_add_goes_last() {
    let mut map = NestedMap::from(config());
    let record = map.remove(&"loglevel", Lookup::Path(&[])).unwrap();
    map.insert(record);

    assert_eq!(map.find(&"loglevel", Lookup::Path(&[])), Ok(&Value::Leaf(10)));
    let top = map.dump().keys().cloned().collect::<Vec<_>>();
    assert_eq!(top, vec!["Network", "timeout", "loglevel"]);
}

#[test]
fn int_test_remove_section_cascades() {
    let mut map = NestedMap::from(config());
    map.remove(&"Network", Lookup::Unique).unwrap();

    assert_eq!(map.len(), 2);
    assert!(!map.contains(&"Proxy", Lookup::Unique));
    assert!(!map.contains(&"port", Lookup::Unique));
    assert_eq!(map.find(&"loglevel", Lookup::Unique), Ok(&Value::Leaf(10)));
}

#[test]
fn int_test_remove_section_with_unrecorded_descendants() {
    let mut map = NestedMap::with_name("config");
    map.add_section("Network", vec![0], vec![]);
    map.add("port", 3128, vec![0, 0, 0], vec!["Network", "Proxy"]);
    map.add("host", 1, vec![0, 0, 0, 0], vec!["Network", "Proxy", "hosts"]);
    map.add("timeout", 30, vec![1], vec![]);
    assert_eq!(map.len(), 4);

    map.remove(&"Network", Lookup::Unique).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.node_count(), 1);
    assert!(map.find(&"port", Lookup::Unique).unwrap_err().is_key_not_found());
    assert!(map.find(&"host", Lookup::Unique).unwrap_err().is_key_not_found());
    assert_eq!(map.dump(), &section(vec![("timeout", Nested::Value(30))]));
}

#[test]
fn int_test_dump_after_section_readded() {
    let mut map = NestedMap::from(config());
    map.remove(&"Network", Lookup::Unique).unwrap();
    map.add_section("Network", vec![1], vec![]);
    map.add("port", 8080, vec![1, 0], vec!["Network"]);

    assert_eq!(
        map.dump(),
        &section(vec![
            ("loglevel", Nested::Value(10)),
            ("timeout", Nested::Value(30)),
            ("Network", Nested::Section(section(vec![("port", Nested::Value(8080))]))),
        ]),
    );
    assert_eq!(
        map.find_section(&"Network", Lookup::Unique),
        Ok(section(vec![("port", Nested::Value(8080))])),
    );
    assert!(!map.contains(&"Proxy", Lookup::Unique));
    assert_eq!(map.len(), 4);
}

#[test]
fn int_test_find_section_with_unrecorded_sections() {
    let mut map = NestedMap::new();
    map.add_section("Network", vec![0], vec![]);
    map.add("port", 3128, vec![0, 0, 0], vec!["Network", "Proxy"]);
    map.add("loglevel", 20, vec![0, 1], vec!["Network"]);

    assert_eq!(
        map.find_section(&"Network", Lookup::Unique),
        Ok(section(vec![
            ("Proxy", Nested::Section(section(vec![("port", Nested::Value(3128))]))),
            ("loglevel", Nested::Value(20)),
        ])),
    );
}

#[test]
fn int_test_iter_order() {
    let map = NestedMap::from(config());
    let keys = map.iter().map(|record| *record.key).collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec!["loglevel", "Network", "loglevel", "port", "Proxy", "port", "hosts", "timeout"],
    );

    let mut reversed = map.iter_rev().map(|record| *record.key).collect::<Vec<_>>();
    reversed.reverse();
    assert_eq!(reversed, keys);
    assert_eq!(map.keys().len(), map.len());
    assert_eq!(map.items()[3], (&"port", &Value::Leaf(80)));
}

#[test]
fn int_test_iter_independent_of_seed() {
    let mut map = NestedMap::from(config());
    let expected = map.iter().map(|record| record.to_record()).collect::<Vec<_>>();
    for seed in 0..10 {
        map.set_heap_seed(seed);
        assert_eq!(map.iter().map(|record| record.to_record()).collect::<Vec<_>>(), expected);
    }
}

#[test]
fn int_test_random_leaf_operations() {
    let keys = ["a", "b", "c", "d", "e"];
    let paths: [&[&str]; 3] = [&[], &["x"], &["x", "y"]];
    let mut rng = StdRng::seed_from_u64(0);
    let mut map = NestedMap::with_name("random");
    let mut expected: BTreeMap<(&str, Vec<&str>), u32> = BTreeMap::new();

    for _ in 0..2_000 {
        let key = *keys.choose(&mut rng).unwrap();
        let parents = paths.choose(&mut rng).unwrap().to_vec();
        if rng.gen_bool(0.6) {
            let value = rng.gen::<u32>();
            let old = map.add(key, value, vec![rng.gen_range(0..4); parents.len() + 1], parents.clone());
            assert_eq!(old.and_then(Value::into_leaf), expected.insert((key, parents), value));
        } else {
            let removed = map.remove(&key, Lookup::Path(&parents));
            match expected.remove(&(key, parents)) {
                Some(value) => assert_eq!(removed.unwrap().value, Value::Leaf(value)),
                None => assert!(removed.unwrap_err().is_key_not_found()),
            }
        }
        assert_eq!(map.len(), expected.len());
    }

    for ((key, parents), value) in &expected {
        assert_eq!(map.get(key, Lookup::Path(parents)), Some(value));
        let count = expected.keys().filter(|(other, _)| other == key).count();
        assert_eq!(map.contains(key, Lookup::Unique), count == 1);
    }

    let positions = map.iter().map(|record| record.position.to_vec()).collect::<Vec<_>>();
    assert_eq!(positions.len(), expected.len());
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}
