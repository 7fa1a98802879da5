use super::*;
use tempfile::tempdir;

#[test]
fn file_store_reads_missing_key_as_none() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get_item("cart").unwrap(), None);
}

#[test]
fn file_store_set_get_remove() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open(dir.path().join("nested")).unwrap();

    store.set_item("cart", "[]").unwrap();
    assert_eq!(store.get_item("cart").unwrap().as_deref(), Some("[]"));
    assert!(dir.path().join("nested").join("cart.json").is_file());

    store.set_item("cart", "[1]").unwrap();
    assert_eq!(store.get_item("cart").unwrap().as_deref(), Some("[1]"));

    store.remove_item("cart").unwrap();
    assert_eq!(store.get_item("cart").unwrap(), None);
    // Removing again is fine.
    store.remove_item("cart").unwrap();
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set_item("cart", "[\"x\"]").unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get_item("cart").unwrap().as_deref(), Some("[\"x\"]"));
}

#[test]
fn keys_with_path_characters_are_rejected() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.set_item("../cart", "[]"),
        Err(StorageError::InvalidKey(_))
    ));
    assert!(matches!(
        store.get_item(""),
        Err(StorageError::InvalidKey(_))
    ));

    let mut mem = MemoryStore::new();
    assert!(mem.set_item("a/b", "x").is_err());
}

#[test]
fn memory_store_round_trip() {
    let mut mem = MemoryStore::new();
    assert_eq!(mem.get_item("cart").unwrap(), None);
    mem.set_item("cart", "[]").unwrap();
    assert_eq!(mem.get_item("cart").unwrap().as_deref(), Some("[]"));
    mem.remove_item("cart").unwrap();
    assert_eq!(mem.get_item("cart").unwrap(), None);
}
