//! Tests for filesystem record storage.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use zenith_config::StorageConfig;
use zenith_core::{CharacterCollection, CharacterRecord};
use zenith_error::StorageErrorKind;
use zenith_interface::RecordStorage;
use zenith_storage::{FileClass, FileSystemRecordStorage};

fn record(name: &str) -> CharacterRecord {
    CharacterRecord::builder()
        .name(name)
        .age(42u32)
        .species("Elf")
        .physical_description("Tall, with ink-stained fingers.")
        .personality_description("Patient and wry.")
        .resident_district("Lantern Quarter")
        .build()
        .unwrap()
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_new_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let directory = temp_dir.path().join("nested").join("citizens");
    let config = StorageConfig {
        directory: directory.clone(),
        mirror_collections: false,
    };

    let storage = FileSystemRecordStorage::new(&config).unwrap();

    assert!(directory.is_dir());
    assert_eq!(storage.directory(), directory.as_path());
}

#[tokio::test]
async fn test_save_individual_and_read_back() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    let saved = record("Ilsa Varn");

    let path = storage.save_individual(&saved).await.unwrap();

    let name = file_name(&path);
    assert!(name.ends_with("_Ilsa_Varn.json"), "unexpected name {name}");
    assert_eq!(name.len(), "YYYYMMDD_HHMMSS_Ilsa_Varn.json".len());
    assert_eq!(FileClass::of(&name), FileClass::Record);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"name\": \"Ilsa Varn\""), "not pretty JSON: {text}");

    let listed = storage.list_all().await.unwrap();
    assert_eq!(listed, vec![saved]);
}

#[tokio::test]
async fn test_same_name_never_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();

    let first = storage.save_individual(&record("Twin")).await.unwrap();
    let second = storage.save_individual(&record("Twin")).await.unwrap();
    let third = storage.save_individual(&record("Twin")).await.unwrap();

    assert_ne!(first, second);
    assert_ne!(second, third);
    assert_ne!(first, third);
    assert_eq!(storage.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_writers_do_not_collide() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.save_individual(&record("Crowd")).await })
        })
        .collect();

    let mut paths = Vec::new();
    for handle in handles {
        paths.push(handle.await.unwrap().unwrap());
    }
    paths.sort();
    paths.dedup();

    assert_eq!(paths.len(), 16);
    assert_eq!(storage.stats().await.unwrap().count, 16);
}

#[tokio::test]
async fn test_unsafe_names_are_sanitized() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();

    let path = storage
        .save_individual(&record("../../etc/passwd"))
        .await
        .unwrap();
    assert_eq!(path.parent().unwrap(), temp_dir.path());
    assert!(file_name(&path).ends_with("_etcpasswd.json"));

    let path = storage.save_individual(&record("!!!")).await.unwrap();
    assert!(file_name(&path).ends_with("_unnamed.json"));
}

#[tokio::test]
async fn test_save_collection() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    let records = vec![record("One"), record("Two"), record("Three")];

    let path = storage.save_collection(&records, "req-42").await.unwrap();

    let name = file_name(&path);
    assert!(name.starts_with("collection_"));
    assert!(name.ends_with("_req-42.json"));

    let collection: CharacterCollection =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(collection.label, "req-42");
    assert_eq!(collection.count, 3);
    assert_eq!(collection.records, records);

    // Collections are not individual records
    assert!(storage.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_collection_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();

    let err = storage.save_collection(&[], "empty").await.unwrap_err();

    assert!(matches!(err.kind, StorageErrorKind::EmptyCollection(_)));
    assert!(dir_names(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();

    storage.save_individual(&record("Clean")).await.unwrap();
    storage
        .save_collection(&[record("A"), record("B")], "tidy")
        .await
        .unwrap();

    for name in dir_names(temp_dir.path()) {
        assert_ne!(FileClass::of(&name), FileClass::Temp, "left behind {name}");
    }
}

#[tokio::test]
async fn test_list_all_skips_bad_files() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    let good = record("Survivor");
    storage.save_individual(&good).await.unwrap();

    let dir = temp_dir.path();
    std::fs::write(dir.join("20200101_000000_broken.json"), "{ not json").unwrap();
    std::fs::write(
        dir.join("20200101_000001_blank.json"),
        r#"{"name": " ", "age": 3, "species": "Elf", "physicalDescription": "x",
            "personalityDescription": "y", "residentDistrict": "z"}"#,
    )
    .unwrap();
    std::fs::write(dir.join(".tmp-inflight"), "{").unwrap();
    std::fs::write(dir.join("README.txt"), "not a record").unwrap();

    let listed = storage.list_all().await.unwrap();

    assert_eq!(listed, vec![good]);
}

#[tokio::test]
async fn test_list_all_reads_pascal_case_keys() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    std::fs::write(
        temp_dir.path().join("20240101_090000_Old_Timer.json"),
        r#"{
  "Name": "Old Timer",
  "Age": 88,
  "Species": "Dwarf",
  "PhysicalDescription": "Beard to the knees.",
  "PersonalityDescription": "Remembers the founding.",
  "ResidentDistrict": "Anvil Row"
}"#,
    )
    .unwrap();

    let listed = storage.list_all().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name(), "Old Timer");
}

#[tokio::test]
async fn test_list_all_is_sorted_by_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    for (file, name) in [
        ("20240103_000000_C.json", "C"),
        ("20240101_000000_A.json", "A"),
        ("20240102_000000_B.json", "B"),
    ] {
        std::fs::write(
            temp_dir.path().join(file),
            serde_json::to_string(&record(name)).unwrap(),
        )
        .unwrap();
    }

    let names: Vec<String> = storage
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.name().clone())
        .collect();

    assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn test_stats_counts_files() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();

    let empty = storage.stats().await.unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.total_bytes, 0);
    assert!(empty.oldest.is_none());

    for name in ["A", "B", "C"] {
        storage.save_individual(&record(name)).await.unwrap();
    }
    storage
        .save_collection(&[record("D"), record("E")], "pair")
        .await
        .unwrap();

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.collection_count, 1);
    assert!(stats.total_bytes > 0);
    assert!(stats.oldest.unwrap() <= stats.newest.unwrap());
    assert_eq!(stats.directory, temp_dir.path());
}

#[tokio::test]
async fn test_foreign_json_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path()).unwrap();
    storage.save_individual(&record("Owned")).await.unwrap();

    let stray = serde_json::to_string(&record("Stray")).unwrap();
    std::fs::write(temp_dir.path().join("notes.json"), &stray).unwrap();
    std::fs::write(temp_dir.path().join("collection_notes.json"), "[]").unwrap();

    let listed = storage.list_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name(), "Owned");

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.collection_count, 0);
    let owned_bytes: u64 = dir_names(temp_dir.path())
        .iter()
        .filter(|name| FileClass::of(name).is_record())
        .map(|name| std::fs::metadata(temp_dir.path().join(name)).unwrap().len())
        .sum();
    assert_eq!(stats.total_bytes, owned_bytes);
}

#[tokio::test]
async fn test_missing_directory_is_scan_error() {
    let temp_dir = TempDir::new().unwrap();
    let directory = temp_dir.path().join("citizens");
    let storage = FileSystemRecordStorage::with_directory(&directory).unwrap();
    std::fs::remove_dir(&directory).unwrap();

    let err = storage.list_all().await.unwrap_err();
    assert!(matches!(err.kind, StorageErrorKind::DirectoryScan(_)));

    let err = storage.save_individual(&record("Lost")).await.unwrap_err();
    assert!(matches!(err.kind, StorageErrorKind::FileWrite(_)));
}
