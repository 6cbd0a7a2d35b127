//! Tests for the request orchestrator.

mod test_utils;

use tempfile::TempDir;
use test_utils::{BrokenStorage, MockDriver, MockResponse, test_config, valid_reply};
use zenith_config::ZenithConfig;
use zenith_core::{GenerationPreferences, GenerationRequest};
use zenith_error::{GenerationErrorKind, ZenithErrorKind};
use zenith_interface::{GenerationOutcome, GenerationService, RecordStorage};
use zenith_models::CharacterGenerator;
use zenith_service::Orchestrator;
use zenith_storage::FileSystemRecordStorage;

fn orchestrator<S: RecordStorage>(
    driver: MockDriver,
    storage: S,
    config: &ZenithConfig,
) -> Orchestrator<MockDriver, S> {
    let generator = CharacterGenerator::new(driver, &config.generation, &config.model);
    Orchestrator::new(generator, storage, config)
}

fn json_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".json"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_elf_is_saved() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Aerendyl", "Elf"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver.clone(), storage, &config);

    let prefs = GenerationPreferences::builder()
        .species_preference("Elf")
        .build()?;
    let outcome = service.handle_single(prefs).await?;

    assert_eq!(outcome.record.species(), "Elf");
    assert_eq!(outcome.record.name(), "Aerendyl");
    assert!(outcome.persistence.is_saved());
    let path = outcome.persistence.path().unwrap();
    assert!(path.starts_with(temp_dir.path()));
    assert_eq!(driver.call_count(), 1);
    assert_eq!(json_files(temp_dir.path()).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_single_forces_count_to_one() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Solo", "Human"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver.clone(), storage, &config);

    let prefs = GenerationPreferences::builder().count(50).build()?;
    service.handle_single(prefs).await?;

    assert_eq!(driver.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_batch_with_one_retried_slot() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::sequence(vec![
        MockResponse::Text(valid_reply("First", "Dwarf")),
        MockResponse::Text("I'd rather not".to_string()),
        MockResponse::Text(r#"{"Name": "Half"}"#.to_string()),
        MockResponse::Text(valid_reply("Second", "Dwarf")),
        MockResponse::Text(valid_reply("Third", "Dwarf")),
    ]);
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver.clone(), storage, &config);

    let prefs = GenerationPreferences::builder().count(3).build()?;
    let outcome = service.handle_batch(prefs).await?;

    let names: Vec<&str> = outcome.records.iter().map(|r| r.name().as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
    assert_eq!(outcome.requested_count, 3);
    assert_eq!(outcome.succeeded_count, 3);
    assert_eq!(outcome.failed_count, 0);
    assert_eq!(driver.call_count(), 5);
    assert!(outcome.individual_files.is_empty());

    let files = json_files(temp_dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("collection_"));
    assert!(files[0].ends_with("_batch.json"));
    Ok(())
}

#[tokio::test]
async fn test_batch_of_one_is_saved_individually() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Lone Walker", "Human"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver, storage, &config);

    let outcome = service
        .handle_batch(GenerationPreferences::default())
        .await?;

    assert_eq!(outcome.requested_count, 1);
    assert_eq!(outcome.succeeded_count, 1);
    assert!(outcome.persistence.is_saved());
    assert_eq!(outcome.individual_files.len(), 1);

    let files = json_files(temp_dir.path());
    assert_eq!(files.len(), 1);
    assert!(!files[0].starts_with("collection_"), "wrote {files:?}");
    assert!(files[0].ends_with("_Lone_Walker.json"));

    let listed = service.list_records().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name(), "Lone Walker");
    assert_eq!(service.storage_stats().await?.collection_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_batch_partial_failure_accounting() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(2);
    let driver = MockDriver::sequence(vec![
        MockResponse::Text(valid_reply("Kept", "Gnome")),
        MockResponse::Text("nope".to_string()),
        MockResponse::Text("still nope".to_string()),
        MockResponse::Text(valid_reply("Also Kept", "Gnome")),
    ]);
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver, storage, &config);

    let prefs = GenerationPreferences::builder().count(3).build()?;
    let outcome = service.handle_batch(prefs).await?;

    assert_eq!(outcome.succeeded_count, 2);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(
        outcome.succeeded_count + outcome.failed_count,
        outcome.requested_count
    );
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].attempts, 2);
    assert!(outcome.persistence.is_saved());
    Ok(())
}

#[tokio::test]
async fn test_storage_failure_keeps_records() -> anyhow::Result<()> {
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Unsaved", "Orc"));
    let storage = BrokenStorage::default();
    let service = orchestrator(driver, storage.clone(), &config);

    let single = service
        .handle_single(GenerationPreferences::default())
        .await?;
    assert_eq!(single.record.name(), "Unsaved");
    assert!(!single.persistence.is_saved());
    assert!(single.persistence.error().unwrap().contains("disk full"));

    let prefs = GenerationPreferences::builder().count(2).build()?;
    let batch = service.handle_batch(prefs).await?;
    assert_eq!(batch.records.len(), 2);
    assert!(batch.persistence.path().is_none());
    assert_eq!(storage.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_count_rejected_before_generation() -> anyhow::Result<()> {
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Never", "Elf"));
    let storage = BrokenStorage::default();
    let service = orchestrator(driver.clone(), storage.clone(), &config);

    for count in [0, config.generation.max_count + 1] {
        let prefs = GenerationPreferences::builder().count(count).build()?;
        let err = service.handle_batch(prefs).await.unwrap_err();
        assert!(matches!(err.kind(), ZenithErrorKind::Validation(_)));
        assert_eq!(err.kind().label(), "validation");
    }

    assert_eq!(driver.call_count(), 0);
    assert_eq!(storage.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_api_skips_storage() -> anyhow::Result<()> {
    let config = test_config(3);
    let driver = MockDriver::failing(GenerationErrorKind::Unauthorized("bad key".to_string()));
    let storage = BrokenStorage::default();
    let service = orchestrator(driver.clone(), storage.clone(), &config);

    let prefs = GenerationPreferences::builder().count(4).build()?;
    let err = service.handle_batch(prefs).await.unwrap_err();

    assert_eq!(err.kind().label(), "generation_unavailable");
    assert_eq!(driver.call_count(), 1);
    assert_eq!(storage.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_all_slots_exhausted() -> anyhow::Result<()> {
    let config = test_config(2);
    let driver = MockDriver::always("no JSON here");
    let storage = BrokenStorage::default();
    let service = orchestrator(driver.clone(), storage.clone(), &config);

    let prefs = GenerationPreferences::builder().count(2).build()?;
    let err = service.handle_batch(prefs).await.unwrap_err();

    match err.kind() {
        ZenithErrorKind::Generation(e) => assert!(matches!(
            e.kind,
            GenerationErrorKind::Exhausted {
                requested: 2,
                attempts: 2
            }
        )),
        other => panic!("expected generation error, got {other:?}"),
    }
    assert_eq!(driver.call_count(), 4);
    assert_eq!(storage.calls(), 0);

    let err = service
        .handle_single(GenerationPreferences::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind().label(), "generation_exhausted");
    Ok(())
}

#[tokio::test]
async fn test_handle_dispatches_on_count() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Dispatch", "Human"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver, storage, &config);

    let single = GenerationRequest::new(GenerationPreferences::default());
    assert!(matches!(
        service.handle(single).await?,
        GenerationOutcome::Single(_)
    ));

    let batch = GenerationRequest::with_optional_id(
        Some("req-7".to_string()),
        GenerationPreferences::builder().count(2).build()?,
    );
    match service.handle(batch).await? {
        GenerationOutcome::Batch(outcome) => {
            let path = outcome.persistence.path().unwrap();
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(name.ends_with("_req-7.json"), "unexpected {name}");
        }
        GenerationOutcome::Single(_) => panic!("expected batch outcome"),
    }
    Ok(())
}

#[tokio::test]
async fn test_mirrored_collections_write_individual_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = test_config(3);
    config.storage.mirror_collections = true;
    let driver = MockDriver::always(valid_reply("Mirror", "Elf"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver, storage, &config);

    let prefs = GenerationPreferences::builder().count(3).build()?;
    let outcome = service.handle_batch(prefs).await?;

    assert_eq!(outcome.individual_files.len(), 3);
    assert_eq!(service.list_records().await?.len(), 3);
    let stats = service.storage_stats().await?;
    assert_eq!(stats.count, 3);
    assert_eq!(stats.collection_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_stats_count_matches_saved_singles() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(3);
    let driver = MockDriver::always(valid_reply("Counted", "Human"));
    let storage = FileSystemRecordStorage::with_directory(temp_dir.path())?;
    let service = orchestrator(driver, storage, &config);

    for _ in 0..4 {
        service
            .handle_single(GenerationPreferences::default())
            .await?;
    }

    assert_eq!(service.storage_stats().await?.count, 4);
    assert_eq!(service.list_records().await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_storage_read_errors_surface() {
    let config = test_config(3);
    let service = orchestrator(
        MockDriver::always(valid_reply("x", "y")),
        BrokenStorage::default(),
        &config,
    );

    let err = service.list_records().await.unwrap_err();
    assert_eq!(err.kind().label(), "storage");
}

#[test]
fn test_health_reports_service_name() {
    let config = test_config(3);
    let service = orchestrator(
        MockDriver::always(valid_reply("x", "y")),
        BrokenStorage::default(),
        &config,
    );

    let health = service.health();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "zenith-npc-generator-service");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}
