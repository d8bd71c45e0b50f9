use crate::element::{
    Dimension, Element, ElementId, ElementKind, MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, Position,
    clamp_extent,
    Properties,
};
use crate::id_generator;

/// Offset applied to duplicated elements so the copy does not hide the original
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// How a group of elements should be lined up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Canonical collection of placed elements plus the current selection.
///
/// The store has no listeners: edits that should be undoable go through
/// [`crate::command::CommandHistory`].
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new element with a fresh id and the defaults for `kind`.
    ///
    /// The element is not inserted; wrap it in a create command.
    pub fn create_element(&self, kind: ElementKind, position: Position) -> Element {
        let mut element = Element::new(id_generator::generate_id(), kind, position.clamped());
        element.z_index = self.max_z_index() + 1;
        element
    }

    pub fn insert_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Insert at `index`, or at the end when the index is past it
    pub fn insert_element_at(&mut self, index: usize, element: Element) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    pub fn get_element_by_id(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    pub fn get_element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| &el.id == id)
    }

    pub fn position_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| &el.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.position_of(id).is_some()
    }

    /// Remove an element, clearing the selection if it pointed at it
    pub fn delete_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.position_of(id)?;
        let deleted = self.elements.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(deleted)
    }

    /// Select `id`; an unknown id leaves nothing selected
    pub fn select_element(&mut self, id: &ElementId) -> Option<&Element> {
        self.selected = self.contains(id).then(|| id.clone());
        self.selected_element()
    }

    pub fn deselect_element(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected
            .as_ref()
            .and_then(|id| self.get_element_by_id(id))
    }

    pub fn update_element_position(&mut self, id: &ElementId, top: f32, left: f32) -> Option<&Element> {
        let element = self.get_element_mut(id)?;
        element.position = Position::new(top, left).clamped();
        Some(&*element)
    }

    pub fn update_element_size(&mut self, id: &ElementId, width: f32, height: f32) -> Option<&Element> {
        let element = self.get_element_mut(id)?;
        element.size.width = Dimension::Px(clamp_extent(width, MIN_ELEMENT_WIDTH));
        element.size.height = Dimension::Px(clamp_extent(height, MIN_ELEMENT_HEIGHT));
        Some(&*element)
    }

    pub fn update_element_property(
        &mut self,
        id: &ElementId,
        key: &str,
        value: serde_json::Value,
    ) -> Option<&Element> {
        let element = self.get_element_mut(id)?;
        element.properties.insert(key.to_owned(), value);
        Some(&*element)
    }

    /// Merge `properties` into the element's existing ones
    pub fn update_element_properties(&mut self, id: &ElementId, properties: Properties) -> Option<&Element> {
        let element = self.get_element_mut(id)?;
        element.properties.extend(properties);
        Some(&*element)
    }

    pub fn bring_to_front(&mut self, id: &ElementId) -> Option<&Element> {
        let z = self.max_z_index() + 1;
        let element = self.get_element_mut(id)?;
        element.z_index = z;
        Some(&*element)
    }

    /// Move an element below all others. Other elements already below zero
    /// shift up by one so the stack stays compact.
    pub fn send_to_back(&mut self, id: &ElementId) -> Option<&Element> {
        let z = self.min_z_index() - 1;
        self.get_element_mut(id)?.z_index = z;
        for element in self.elements.iter_mut() {
            if &element.id != id && element.z_index < 0 {
                element.z_index += 1;
            }
        }
        self.get_element_by_id(id)
    }

    /// Deep copy of an element with a fresh id, stacked on top and offset.
    /// Not inserted.
    pub fn duplicate_element(&self, id: &ElementId) -> Option<Element> {
        let original = self.get_element_by_id(id)?;
        let mut duplicated = original.clone();
        duplicated.id = id_generator::generate_id();
        duplicated.z_index = self.max_z_index() + 1;
        duplicated.position.top += DUPLICATE_OFFSET;
        duplicated.position.left += DUPLICATE_OFFSET;
        duplicated.created = crate::util::time::timestamp_millis();
        Some(duplicated)
    }

    /// Target positions for lining up `ids`. Unknown ids are skipped.
    pub fn aligned_positions(&self, ids: &[ElementId], alignment: Alignment) -> Vec<(ElementId, Position)> {
        let selected: Vec<&Element> = ids
            .iter()
            .filter_map(|id| self.get_element_by_id(id))
            .collect();
        if selected.is_empty() {
            return Vec::new();
        }

        let count = selected.len() as f32;
        let width = |el: &Element| el.size.width.px().unwrap_or(0.0);
        let height = |el: &Element| el.size.height.px().unwrap_or(0.0);

        selected
            .iter()
            .map(|el| {
                let mut pos = el.position;
                match alignment {
                    Alignment::Left => {
                        pos.left = selected.iter().map(|e| e.position.left).fold(f32::INFINITY, f32::min);
                    }
                    Alignment::Center => {
                        pos.left = selected.iter().map(|e| e.position.left).sum::<f32>() / count;
                    }
                    Alignment::Right => {
                        let max_right = selected
                            .iter()
                            .map(|e| e.position.left + width(*e))
                            .fold(f32::NEG_INFINITY, f32::max);
                        pos.left = max_right - width(*el);
                    }
                    Alignment::Top => {
                        pos.top = selected.iter().map(|e| e.position.top).fold(f32::INFINITY, f32::min);
                    }
                    Alignment::Middle => {
                        pos.top = selected.iter().map(|e| e.position.top).sum::<f32>() / count;
                    }
                    Alignment::Bottom => {
                        let max_bottom = selected
                            .iter()
                            .map(|e| e.position.top + height(*e))
                            .fold(f32::NEG_INFINITY, f32::max);
                        pos.top = max_bottom - height(*el);
                    }
                }
                (el.id.clone(), pos)
            })
            .collect()
    }

    pub fn max_z_index(&self) -> i32 {
        self.elements.iter().map(|el| el.z_index).max().unwrap_or(0)
    }

    pub fn min_z_index(&self) -> i32 {
        self.elements.iter().map(|el| el.z_index).min().unwrap_or(0)
    }

    /// Elements in paint order, lowest z-index first
    pub fn sorted_by_z_index(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by_key(|el| el.z_index);
        sorted
    }

    pub fn clear_elements(&mut self) {
        self.elements.clear();
        self.selected = None;
    }

    pub fn elements_data(&self) -> &[Element] {
        &self.elements
    }

    /// Replace the whole collection. No merge; the selection is dropped.
    pub fn load_elements_data(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selected = None;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
