use blog_builder::command::{Command, CommandError, CommandHistory};
use blog_builder::element::{Element, ElementId, ElementKind, Position};
use blog_builder::event::EditorEvent;
use blog_builder::store::ElementStore;
use serde_json::json;
use std::sync::Arc;

// Helper to create a store with a few placed elements
fn create_test_store() -> ElementStore {
    let mut store = ElementStore::new();
    for (i, kind) in [ElementKind::Text, ElementKind::Image, ElementKind::Button]
        .into_iter()
        .enumerate()
    {
        let mut element = Element::new(
            ElementId::from(format!("el-{}", i).as_str()),
            kind,
            Position::new(10.0 * i as f32, 20.0),
        );
        element.z_index = i as i32 + 1;
        store.insert_element(element);
    }
    store
}

fn moved(store: &ElementStore, id: &str, top: f32, left: f32) -> Command {
    let old = store.get_element_by_id(&ElementId::from(id)).unwrap();
    let mut new = old.clone();
    new.position = Position::new(top, left);
    Command::update(old, &new)
}

#[test]
fn test_undo_then_redo_restores_each_state() {
    let mut store = ElementStore::new();
    let mut history = CommandHistory::new();
    let mut states = vec![store.elements_data().to_vec()];

    let a = store.create_element(ElementKind::Text, Position::new(0.0, 0.0));
    history.execute(Command::create(&a), &mut store);
    states.push(store.elements_data().to_vec());

    let b = store.create_element(ElementKind::Heading, Position::new(10.0, 10.0));
    history.execute(Command::create(&b), &mut store);
    states.push(store.elements_data().to_vec());

    let cmd = moved(&store, a.id.as_str(), 100.0, 200.0);
    history.execute(cmd, &mut store);
    states.push(store.elements_data().to_vec());

    let cmd = Command::update_property(&store, &b.id, "properties.content", json!("Hello")).unwrap();
    history.execute(cmd, &mut store);
    states.push(store.elements_data().to_vec());

    // Walk all the way back, checking each intermediate state
    for expected in states.iter().rev().skip(1) {
        assert!(history.undo(&mut store));
        assert_eq!(store.elements_data(), expected.as_slice());
    }
    assert!(!history.undo(&mut store));

    // And all the way forward again
    for expected in states.iter().skip(1) {
        assert!(history.redo(&mut store));
        assert_eq!(store.elements_data(), expected.as_slice());
    }
    assert!(!history.redo(&mut store));
}

#[test]
fn test_new_command_discards_redo_branch() {
    let mut store = create_test_store();
    let mut history = CommandHistory::new();

    history.execute(moved(&store, "el-0", 5.0, 5.0), &mut store);
    history.execute(moved(&store, "el-1", 6.0, 6.0), &mut store);
    assert!(history.undo(&mut store));
    assert!(history.can_redo());

    history.execute(moved(&store, "el-2", 7.0, 7.0), &mut store);

    assert!(!history.can_redo());
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_index(), Some(1));
    // The undone move stays undone
    let el1 = store.get_element_by_id(&ElementId::from("el-1")).unwrap();
    assert_eq!(el1.position, Position::new(10.0, 20.0));
}

#[test]
fn test_history_is_bounded() {
    let mut store = ElementStore::new();
    let mut history = CommandHistory::new();

    for i in 0..60 {
        let element = store.create_element(ElementKind::Text, Position::new(i as f32, 0.0));
        history.execute(Command::create(&element), &mut store);
    }

    assert_eq!(history.len(), 50);
    assert_eq!(history.current_index(), Some(49));
    assert_eq!(store.len(), 60);

    let mut undone = 0;
    while history.undo(&mut store) {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The ten oldest creations fell out of the history and stay put
    assert_eq!(store.len(), 10);
    assert_eq!(history.current_index(), None);
}

#[test]
fn test_delete_undo_redo() {
    let mut store = create_test_store();
    let mut history = CommandHistory::new();
    let id = ElementId::from("el-1");
    let original = store.elements_data().to_vec();

    let cmd = Command::delete(&store, &id).unwrap();
    history.execute(cmd, &mut store);
    assert!(!store.contains(&id));
    assert_eq!(store.len(), 2);

    assert!(history.undo(&mut store));
    // Back in its original slot with identical content
    assert_eq!(store.elements_data(), original.as_slice());

    assert!(history.redo(&mut store));
    assert!(!store.contains(&id));
}

#[test]
fn test_delete_unknown_element_is_an_error() {
    let store = create_test_store();
    let err = Command::delete(&store, &ElementId::from("missing")).unwrap_err();
    assert_eq!(err, CommandError::ElementNotFound(ElementId::from("missing")));
}

#[test]
fn test_move_undo_redo() {
    let mut store = ElementStore::new();
    let mut history = CommandHistory::new();
    let element = Element::new(ElementId::from("mover"), ElementKind::Button, Position::new(10.0, 20.0));
    history.execute(Command::create(&element), &mut store);

    history.execute(moved(&store, "mover", 50.0, 60.0), &mut store);
    let position = |store: &ElementStore| store.get_element_by_id(&element.id).unwrap().position;
    assert_eq!(position(&store), Position::new(50.0, 60.0));

    history.undo(&mut store);
    assert_eq!(position(&store), Position::new(10.0, 20.0));

    history.redo(&mut store);
    assert_eq!(position(&store), Position::new(50.0, 60.0));
}

#[test]
fn test_property_path_undo_restores_exact_state() {
    let mut store = create_test_store();
    let mut history = CommandHistory::new();
    let id = ElementId::from("el-0");
    let before = store.get_element_by_id(&id).unwrap().clone();

    let cmd = Command::update_property(&store, &id, "properties.shadow.color", json!("#333333")).unwrap();
    history.execute(cmd, &mut store);
    let after = store.get_element_by_id(&id).unwrap();
    assert_eq!(after.properties["shadow"]["color"], json!("#333333"));

    history.undo(&mut store);
    // The intermediate "shadow" object must not linger
    assert_eq!(store.get_element_by_id(&id).unwrap(), &before);

    let cmd = Command::update_property(&store, &id, "position.top", json!(75)).unwrap();
    history.execute(cmd, &mut store);
    assert_eq!(store.get_element_by_id(&id).unwrap().position.top, 75.0);
    history.undo(&mut store);
    assert_eq!(store.get_element_by_id(&id).unwrap(), &before);
}

#[test]
fn test_invalid_property_paths_are_rejected() {
    let store = create_test_store();
    let id = ElementId::from("el-0");

    assert!(matches!(
        Command::update_property(&store, &id, "", json!(1)),
        Err(CommandError::InvalidPath(_))
    ));
    assert!(matches!(
        Command::update_property(&store, &id, "position.top", json!("high")),
        Err(CommandError::InvalidPath(_))
    ));
    assert!(matches!(
        Command::update_property(&store, &ElementId::from("nope"), "properties.content", json!("x")),
        Err(CommandError::ElementNotFound(_))
    ));
}

#[test]
fn test_batch_undo_runs_in_reverse() {
    let mut store = create_test_store();
    let mut history = CommandHistory::new();
    let original = store.elements_data().to_vec();

    let first = moved(&store, "el-0", 1.0, 1.0);
    let delete = Command::delete(&store, &ElementId::from("el-2")).unwrap();
    history.execute(Command::batch("Tidy", vec![first, delete]), &mut store);
    assert_eq!(store.len(), 2);
    assert_eq!(history.entries()[0].label(), "Tidy");

    history.undo(&mut store);
    assert_eq!(store.elements_data(), original.as_slice());
}

#[test]
fn test_history_listeners_see_status() {
    let mut store = ElementStore::new();
    let mut history = CommandHistory::new();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = history.subscribe(Box::new(move |event: &EditorEvent| {
        if let EditorEvent::HistoryChanged(status) = event {
            sink.lock().push(*status);
        }
    }));

    let element = store.create_element(ElementKind::Divider, Position::new(0.0, 0.0));
    history.execute(Command::create(&element), &mut store);
    history.undo(&mut store);

    {
        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].can_undo && !seen[0].can_redo);
        assert_eq!(seen[0].current_index, Some(0));
        assert!(!seen[1].can_undo && seen[1].can_redo);
        assert_eq!(seen[1].history_size, 1);
    }

    assert!(history.unsubscribe(listener));
    history.redo(&mut store);
    assert_eq!(seen.lock().len(), 2);
}

#[test]
fn test_snapshots_are_independent_of_live_elements() {
    let mut store = create_test_store();
    let mut history = CommandHistory::new();
    let id = ElementId::from("el-0");

    let cmd = Command::update_property(&store, &id, "properties.content", json!("first")).unwrap();
    history.execute(cmd, &mut store);

    // Edit the live element behind the history's back
    store
        .update_element_property(&id, "content", json!("tampered"))
        .unwrap();

    history.undo(&mut store);
    history.redo(&mut store);
    assert_eq!(
        store.get_element_by_id(&id).unwrap().properties["content"],
        json!("first")
    );
}
