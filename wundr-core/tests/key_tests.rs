use wundr_core::{derive_id, id_from_storage_key, normalize_object, storage_key, Level};

#[test]
fn same_tuple_always_derives_the_same_id() {
    let a = derive_id("es", "guitar", Level::A2).unwrap();
    let b = derive_id("es", "guitar", Level::A2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn distinct_tuples_never_collide() {
    let ids = [
        derive_id("es", "guitar", Level::A2).unwrap(),
        derive_id("es", "guitar", Level::B2).unwrap(),
        derive_id("fr", "guitar", Level::A2).unwrap(),
        derive_id("es", "piano", Level::A2).unwrap(),
    ];
    for (i, a) in ids.iter().enumerate() {
        for b in ids.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn separator_inside_the_object_cannot_forge_another_tuple() {
    // Unescaped these would both come out as "es|a|b|A2".
    let a = derive_id("es", "a|b", Level::A2).unwrap();
    let b = derive_id("es|a", "b", Level::A2).unwrap();
    assert_ne!(a, b);

    // Escape text itself cannot collide with a literal occurrence.
    let c = derive_id("es", "a%7Cb", Level::A2).unwrap();
    assert_ne!(a, c);
}

#[test]
fn object_is_trimmed_and_lowercased_before_derivation() {
    assert_eq!(normalize_object("  Guitar "), "guitar");
    let a = derive_id("es", "  Guitar ", Level::A2).unwrap();
    let b = derive_id("es", "guitar", Level::A2).unwrap();
    assert_eq!(a, b);

    // Target code case is unified too.
    let c = derive_id("ES", "guitar", Level::A2).unwrap();
    assert_eq!(b, c);
}

#[test]
fn empty_object_or_target_is_rejected() {
    assert!(derive_id("es", "   ", Level::A2).is_err());
    assert!(derive_id("", "guitar", Level::A2).is_err());
}

#[test]
fn storage_key_is_namespaced_and_reversible() {
    let id = derive_id("es", "guitar", Level::A2).unwrap();
    let key = storage_key(&id);
    assert!(key.starts_with("flashcard:"));
    assert_eq!(id_from_storage_key(&key), Some(id.as_str()));
    assert_eq!(id_from_storage_key("other:thing"), None);
}

#[test]
fn level_parses_both_cases_and_rejects_unknown() {
    assert_eq!("b1".parse::<Level>().unwrap(), Level::B1);
    assert_eq!(" C2 ".parse::<Level>().unwrap(), Level::C2);
    assert!("D1".parse::<Level>().is_err());
}
