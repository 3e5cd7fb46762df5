use register_core::{storage::RegisterStorage, CoreError, RegisterService};
use register_domain::Register;
use register_storage_json::JsonRegisterStorage;
use std::fs;
use tempfile::tempdir;

fn storage_in(dir: &std::path::Path) -> JsonRegisterStorage {
    JsonRegisterStorage::new(dir.join("registers"), dir.join("backups")).expect("create storage")
}

#[test]
fn json_storage_can_save_and_load_register() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let mut register = RegisterService::create("StorageTest");
    RegisterService::seed_sample(&mut register);

    storage
        .save_register("Head Office", &register)
        .expect("save register");
    let loaded = storage.load_register("head office").expect("load register");

    assert_eq!(loaded.name, "StorageTest");
    assert_eq!(loaded.assets.len(), register.assets.len());
    for (loaded, original) in loaded.assets.iter().zip(&register.assets) {
        assert_eq!(loaded.code, original.code);
        assert_eq!(loaded.method, original.method);
        assert_eq!(loaded.status, original.status);
        assert!((loaded.original_value - original.original_value).abs() < 1e-9);
    }
    let path = storage.register_path("Head Office");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("head_office.json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(storage.list_registers().unwrap(), vec!["head_office".to_string()]);
}

#[test]
fn missing_register_is_reported_by_name() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let err = storage.load_register("ghost").expect_err("missing register");
    assert!(matches!(err, CoreError::RegisterNotFound(name) if name == "ghost"));
}

#[test]
fn overwriting_a_register_keeps_the_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let register = Register::new("First");
    storage.save_register("main", &register).expect("first save");
    assert!(storage.list_backups("main").unwrap().is_empty());

    let mut renamed = register.clone();
    RegisterService::rename(&mut renamed, "Second").unwrap();
    storage.save_register("main", &renamed).expect("second save");

    let backups = storage.list_backups("main").expect("list backups");
    assert_eq!(backups.len(), 1);
    let previous = storage.restore_backup(&backups[0]).expect("restore");
    assert_eq!(previous.name, "First");
    assert_eq!(storage.load_register("main").unwrap().name, "First");
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let register = Register::new("BackupTest");
    storage.save_register("backup-register", &register).expect("save");

    let info = storage
        .backup_register("backup-register", &register, Some("Year end 2024"))
        .expect("create backup");
    assert!(info.id.ends_with("_year-end-2024.json"), "id: {}", info.id);
    assert_eq!(
        info.path.parent().map(|parent| parent.to_path_buf()),
        Some(dir.path().join("backups").join("backup-register"))
    );

    let backups = storage.list_backups("backup-register").expect("list backups");
    assert!(backups.iter().any(|entry| entry.id == info.id));

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored.name, register.name);
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonRegisterStorage::with_retention(
        dir.path().join("registers"),
        dir.path().join("backups"),
        2,
    )
    .expect("create storage");
    let register = Register::new("Retention");

    for note in ["one", "two", "three", "four"] {
        storage
            .backup_register("retained", &register, Some(note))
            .expect("backup");
    }

    let metadata = storage.list_backup_metadata("retained").expect("metadata");
    assert_eq!(metadata.len(), 2);
    assert!(metadata.iter().all(|meta| meta.created_at.is_some()));
    assert!(metadata.iter().all(|meta| meta.size_bytes > 0));
}

#[test]
fn loads_files_written_without_optional_fields() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());
    let path = storage.register_path("legacy");
    fs::write(
        &path,
        r#"{
            "id": "6f1c1d2e-0000-4000-8000-000000000000",
            "name": "Legacy",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#,
    )
    .expect("write legacy file");

    let loaded = storage.load_register("legacy").expect("load legacy register");
    assert_eq!(loaded.name, "Legacy");
    assert!(loaded.families.is_empty());

    let metadata = storage.list_register_metadata().expect("metadata");
    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata[0].asset_count, 0);
}

#[test]
fn corrupt_files_surface_as_serde_errors() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());
    fs::write(storage.register_path("broken"), "{ not json").expect("write");

    let err = storage.load_register("broken").expect_err("corrupt file");
    assert!(matches!(err, CoreError::Serde(_)));
}
