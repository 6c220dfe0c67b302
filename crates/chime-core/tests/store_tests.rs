use chime_core::{keys, KeyValueStore, SqliteStore};
use tempfile::NamedTempFile;

fn create_test_store() -> (NamedTempFile, SqliteStore) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let store = SqliteStore::open(temp_file.path()).expect("Failed to open test store");
    (temp_file, store)
}

#[test]
fn test_values_survive_reopen() {
    let (temp_file, mut store) = create_test_store();
    store.set_int(&keys::first_target("morning"), 1_714_543_200).unwrap();
    store
        .set_string_array(
            &keys::active_ids("morning"),
            &["wake".to_string(), "coffee".to_string()],
        )
        .unwrap();
    store.set_bool(&keys::allow_snooze("wake"), false).unwrap();
    drop(store);

    let reopened = SqliteStore::open(temp_file.path()).unwrap();
    assert_eq!(
        reopened.get_int(&keys::first_target("morning")).unwrap(),
        Some(1_714_543_200)
    );
    assert_eq!(
        reopened.get_string_array(&keys::active_ids("morning")).unwrap(),
        Some(vec!["wake".to_string(), "coffee".to_string()])
    );
    assert_eq!(reopened.get_bool(&keys::allow_snooze("wake")).unwrap(), Some(false));
}

#[test]
fn test_committed_batch_is_visible_to_other_connections() {
    let (temp_file, mut writer) = create_test_store();
    let reader = SqliteStore::open(temp_file.path()).unwrap();

    writer.begin_batch().unwrap();
    writer.set_string(&keys::title("wake"), "Wake up").unwrap();
    assert_eq!(reader.get_string(&keys::title("wake")).unwrap(), None);
    writer.commit_batch().unwrap();

    assert_eq!(
        reader.get_string(&keys::title("wake")).unwrap(),
        Some("Wake up".to_string())
    );
}

#[test]
fn test_double_values_and_removal() {
    let (_temp_file, mut store) = create_test_store();
    store.set_double("volume", 0.75).unwrap();
    assert_eq!(store.get_double("volume").unwrap(), Some(0.75));
    assert_eq!(store.get_int("volume").unwrap(), None);

    store.remove("volume").unwrap();
    store.remove("volume").unwrap();
    assert_eq!(store.get_double("volume").unwrap(), None);
}
