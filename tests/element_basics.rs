use blog_builder::element::{Dimension, Element, ElementId, ElementKind, Position};
use blog_builder::store::{Alignment, DUPLICATE_OFFSET, ElementStore};
use serde_json::json;

fn create_test_element(id: &str, kind: ElementKind, top: f32, left: f32) -> Element {
    Element::new(ElementId::from(id), kind, Position::new(top, left))
}

#[test]
fn test_element_defaults_per_kind() {
    let text = create_test_element("t", ElementKind::Text, 0.0, 0.0);
    assert_eq!(text.size.width, Dimension::Px(300.0));
    assert_eq!(text.size.height, Dimension::Auto);
    assert_eq!(text.text_content(), Some("Click to edit text"));

    let divider = create_test_element("d", ElementKind::Divider, 0.0, 0.0);
    assert_eq!(divider.size.width, Dimension::Percent(100.0));
    assert_eq!(divider.text_content(), None);

    let button = create_test_element("b", ElementKind::Button, 0.0, 0.0);
    assert_eq!(button.text_content(), Some("Click me"));
}

#[test]
fn test_element_json_shape() {
    let mut element = create_test_element("element-1", ElementKind::Heading, 30.0, 60.0);
    element.z_index = 3;
    element.created = 1_700_000_000_000;

    let value = serde_json::to_value(&element).unwrap();
    assert_eq!(value["id"], "element-1");
    assert_eq!(value["type"], "heading");
    assert_eq!(value["position"], json!({ "top": 30.0, "left": 60.0 }));
    assert_eq!(value["size"]["height"], "auto");
    assert_eq!(value["zIndex"], 3);
    assert_eq!(value["properties"]["level"], "h2");

    let parsed: Element = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, element);
}

#[test]
fn test_element_json_accepts_percent_and_rejects_garbage() {
    let raw = json!({
        "id": "g",
        "type": "grid",
        "position": { "top": 0, "left": 0 },
        "size": { "width": "50%", "height": 120 },
    });
    let grid: Element = serde_json::from_value(raw).unwrap();
    assert_eq!(grid.size.width, Dimension::Percent(50.0));
    assert_eq!(grid.size.height, Dimension::Px(120.0));
    assert_eq!(grid.z_index, 0);
    assert!(grid.properties.is_empty());

    let bad = json!({
        "id": "g",
        "type": "carousel",
        "position": { "top": 0, "left": 0 },
        "size": { "width": 1, "height": 1 },
    });
    assert!(serde_json::from_value::<Element>(bad).is_err());
}

#[test]
fn test_create_element_does_not_insert() {
    let store = ElementStore::new();
    let element = store.create_element(ElementKind::Image, Position::new(-10.0, 40.0));

    assert!(store.is_empty());
    assert!(element.id.as_str().starts_with("element-"));
    assert_eq!(element.position, Position::new(0.0, 40.0));
    assert_eq!(element.z_index, 1);
}

#[test]
fn test_ids_are_unique() {
    let store = ElementStore::new();
    let a = store.create_element(ElementKind::Text, Position::default());
    let b = store.create_element(ElementKind::Text, Position::default());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_selection_follows_deletion() {
    let mut store = ElementStore::new();
    store.insert_element(create_test_element("a", ElementKind::Text, 0.0, 0.0));
    store.insert_element(create_test_element("b", ElementKind::Text, 0.0, 0.0));

    assert!(store.select_element(&ElementId::from("a")).is_some());
    assert_eq!(store.selected_id(), Some(&ElementId::from("a")));

    // Selecting an unknown id leaves nothing selected
    assert!(store.select_element(&ElementId::from("zzz")).is_none());
    assert_eq!(store.selected_id(), None);

    store.select_element(&ElementId::from("b"));
    store.delete_element(&ElementId::from("b"));
    assert_eq!(store.selected_element(), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_store_updates_clamp_and_enforce_minimums() {
    let mut store = ElementStore::new();
    let id = ElementId::from("a");
    store.insert_element(create_test_element("a", ElementKind::Button, 5.0, 5.0));

    let element = store.update_element_position(&id, -4.0, 12.0).unwrap();
    assert_eq!(element.position, Position::new(0.0, 12.0));

    let element = store.update_element_size(&id, 10.0, 5.0).unwrap();
    assert_eq!(element.size.width, Dimension::Px(50.0));
    assert_eq!(element.size.height, Dimension::Px(20.0));

    assert!(store.update_element_position(&ElementId::from("nope"), 1.0, 1.0).is_none());
}

#[test]
fn test_z_order_operations() {
    let mut store = ElementStore::new();
    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        let mut element = create_test_element(id, ElementKind::Text, 0.0, 0.0);
        element.z_index = i as i32 + 1;
        store.insert_element(element);
    }

    store.bring_to_front(&ElementId::from("a"));
    let order: Vec<&str> = store.sorted_by_z_index().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, ["b", "c", "a"]);

    store.send_to_back(&ElementId::from("c"));
    let order: Vec<&str> = store.sorted_by_z_index().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, ["c", "b", "a"]);
}

#[test]
fn test_duplicate_is_offset_and_on_top() {
    let mut store = ElementStore::new();
    let mut original = create_test_element("a", ElementKind::Text, 10.0, 10.0);
    original.z_index = 4;
    store.insert_element(original.clone());

    let copy = store.duplicate_element(&original.id).unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.z_index, 5);
    assert_eq!(
        copy.position,
        Position::new(10.0 + DUPLICATE_OFFSET, 10.0 + DUPLICATE_OFFSET)
    );
    assert_eq!(copy.properties, original.properties);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_aligned_positions() {
    let mut store = ElementStore::new();
    store.insert_element(create_test_element("a", ElementKind::Button, 10.0, 30.0));
    store.insert_element(create_test_element("b", ElementKind::Button, 50.0, 90.0));
    let ids = [ElementId::from("a"), ElementId::from("b"), ElementId::from("ghost")];

    let left = store.aligned_positions(&ids, Alignment::Left);
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|(_, pos)| pos.left == 30.0));

    let top = store.aligned_positions(&ids, Alignment::Top);
    assert!(top.iter().all(|(_, pos)| pos.top == 10.0));

    // Buttons are 150 wide, so right edges meet at 90 + 150
    let right = store.aligned_positions(&ids, Alignment::Right);
    assert!(right.iter().all(|(_, pos)| pos.left == 90.0));
}

#[test]
fn test_load_replaces_content() {
    let mut store = ElementStore::new();
    store.insert_element(create_test_element("old", ElementKind::Text, 0.0, 0.0));
    store.select_element(&ElementId::from("old"));

    store.load_elements_data(vec![
        create_test_element("x", ElementKind::Video, 0.0, 0.0),
        create_test_element("y", ElementKind::Grid, 0.0, 0.0),
    ]);
    assert_eq!(store.len(), 2);
    assert!(!store.contains(&ElementId::from("old")));
    assert_eq!(store.selected_id(), None);

    store.clear_elements();
    assert!(store.is_empty());
}
