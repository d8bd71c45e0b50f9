use std::sync::Arc;
use std::time::Duration;

use blog_builder::element::{ElementKind, Position};
use blog_builder::event::EditorEvent;
use blog_builder::state::{
    AutoSave, AutoSaveSettings, BuilderMetadata, DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage,
    StorageBackend,
};
use blog_builder::store::ElementStore;
use parking_lot::Mutex;

fn settings() -> AutoSaveSettings {
    AutoSaveSettings {
        interval: Duration::from_secs(5),
        ..AutoSaveSettings::default()
    }
}

fn store_with(count: usize) -> ElementStore {
    let mut store = ElementStore::new();
    for i in 0..count {
        let element = store.create_element(ElementKind::Text, Position::new(i as f32 * 10.0, 0.0));
        store.insert_element(element);
    }
    store
}

/// Collects every event the auto-save emits
fn record_events(autosave: &mut AutoSave) -> Arc<Mutex<Vec<EditorEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    autosave.subscribe(Box::new(move |event: &EditorEvent| {
        sink.lock().push(event.clone());
    }));
    events
}

fn save_count(events: &Mutex<Vec<EditorEvent>>) -> usize {
    events
        .lock()
        .iter()
        .filter(|e| matches!(e, EditorEvent::Saved { .. }))
        .count()
}

#[test]
fn test_burst_of_changes_saves_once() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::new()), settings());
    let events = record_events(&mut autosave);
    let store = store_with(2);

    for i in 0..5 {
        autosave.mark_dirty(i as f64 * 0.5);
    }
    // Last change at t=2.0, so nothing is due before t=7.0
    for now in [2.5, 4.0, 6.9] {
        assert!(!autosave.poll(now, &store));
    }
    assert_eq!(save_count(&events), 0);

    assert!(autosave.poll(7.0, &store));
    assert!(!autosave.poll(20.0, &store));
    assert_eq!(save_count(&events), 1);
    assert!(!autosave.has_unsaved_changes());
    assert!(autosave.last_save_time().is_some());
}

#[test]
fn test_saved_state_round_trips() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::new()), settings());
    let store = store_with(3);
    autosave.save_metadata(&BuilderMetadata {
        title: Some("Scholarships 2025".into()),
        ..Default::default()
    });
    autosave.mark_dirty(0.0);
    autosave.force_save(&store);
    assert!(!autosave.has_pending_save());

    let mut restored = ElementStore::new();
    let snapshot = autosave.load(&mut restored).unwrap();
    assert_eq!(restored.elements_data(), store.elements_data());
    assert_eq!(
        snapshot.metadata.and_then(|m| m.title).as_deref(),
        Some("Scholarships 2025")
    );
    assert!(snapshot.timestamp > 0);
}

#[test]
fn test_load_with_nothing_saved() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::new()), settings());
    let mut store = store_with(2);
    let before = store.elements_data().to_vec();

    assert!(autosave.load(&mut store).is_none());
    assert_eq!(store.elements_data(), before.as_slice());
}

#[test]
fn test_corrupt_save_is_ignored() {
    let mut storage = MemoryStorage::new();
    storage.set_item(DEFAULT_STORAGE_KEY, "{ not json").unwrap();
    let mut autosave = AutoSave::new(Box::new(storage), settings());
    let events = record_events(&mut autosave);
    let mut store = store_with(1);
    let before = store.elements_data().to_vec();

    assert!(autosave.load(&mut store).is_none());
    assert_eq!(store.elements_data(), before.as_slice());
    assert!(events.lock().is_empty());
}

#[test]
fn test_quota_failure_keeps_changes_pending() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::with_quota(32)), settings());
    let events = record_events(&mut autosave);
    let store = store_with(5);

    autosave.mark_dirty(0.0);
    assert!(autosave.poll(5.0, &store));

    assert!(autosave.has_unsaved_changes());
    assert_eq!(autosave.last_save_time(), None);
    let events = events.lock();
    assert_eq!(events.len(), 1);
    match &events[0] {
        EditorEvent::SaveFailed { error } => assert!(error.contains("quota")),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_metadata_write_failure_is_reported() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::with_quota(48)), settings());
    let events = record_events(&mut autosave);

    autosave.save_metadata(&BuilderMetadata {
        title: Some("A title far too long for the storage quota".into()),
        ..Default::default()
    });

    assert!(autosave.metadata().is_empty());
    let events = events.lock();
    assert_eq!(events.len(), 1);
    match &events[0] {
        EditorEvent::SaveFailed { error } => assert!(error.contains("quota")),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_save_without_changes_does_nothing() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::new()), settings());
    let events = record_events(&mut autosave);

    autosave.force_save(&store_with(1));
    assert!(events.lock().is_empty());
    assert!(autosave.load(&mut ElementStore::new()).is_none());
}

#[test]
fn test_clear_removes_saved_state() {
    let mut autosave = AutoSave::new(Box::new(MemoryStorage::new()), settings());
    let events = record_events(&mut autosave);
    let store = store_with(2);
    autosave.save_metadata(&BuilderMetadata {
        slug: Some("guide".into()),
        ..Default::default()
    });
    autosave.mark_dirty(0.0);
    autosave.force_save(&store);

    autosave.mark_dirty(1.0);
    autosave.clear();

    assert!(!autosave.has_pending_save());
    assert!(!autosave.has_unsaved_changes());
    assert!(autosave.metadata().is_empty());
    assert!(autosave.load(&mut ElementStore::new()).is_none());
    assert_eq!(events.lock().last(), Some(&EditorEvent::SaveCleared));
}

#[test]
fn test_metadata_keeps_unknown_keys() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            "blog-builder-metadata",
            r#"{"title":"Hi","category":"news","author":"Ada"}"#,
        )
        .unwrap();
    let autosave = AutoSave::new(Box::new(storage), settings());

    let metadata = autosave.metadata();
    assert_eq!(metadata.title.as_deref(), Some("Hi"));
    assert_eq!(metadata.category.as_deref(), Some("news"));
    assert_eq!(metadata.extra["author"], "Ada");
}

#[test]
fn test_file_storage_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(4);

    {
        let mut autosave = AutoSave::new(Box::new(FileStorage::new(dir.path())), settings());
        autosave.mark_dirty(0.0);
        autosave.force_save(&store);
    }

    let mut autosave = AutoSave::new(Box::new(FileStorage::new(dir.path())), settings());
    let mut restored = ElementStore::new();
    let snapshot = autosave.load(&mut restored).unwrap();
    assert_eq!(snapshot.elements.len(), 4);
    assert_eq!(restored.elements_data(), store.elements_data());
}
