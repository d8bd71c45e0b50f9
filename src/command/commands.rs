use serde_json::Value;

use super::{CommandError, CommandResult};
use crate::element::{Element, ElementId, PathSnapshot, PropertyPath};
use crate::store::ElementStore;

/// Reversible operations over the element store.
///
/// Every payload is a deep copy taken when the command is built, so later
/// edits to the live element cannot leak into the recorded snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add one element
    Create { element: Element },

    /// Remove one element; the copy and its index are kept for undo
    Delete { element: Element, index: usize },

    /// Replace an element's full state
    Update {
        element_id: ElementId,
        old: Element,
        new: Element,
    },

    /// Set a single value addressed by a property path
    UpdateProperty {
        element_id: ElementId,
        path: PropertyPath,
        old_value: Value,
        new_value: Value,
        before: PathSnapshot,
    },

    /// Several commands applied in order and undone in reverse
    Batch { label: String, commands: Vec<Command> },
}

impl Command {
    pub fn create(element: &Element) -> Self {
        Command::Create {
            element: element.clone(),
        }
    }

    /// Capture the element currently stored under `id` for deletion
    pub fn delete(store: &ElementStore, id: &ElementId) -> CommandResult<Self> {
        let index = store
            .position_of(id)
            .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?;
        let element = store.elements_data()[index].clone();
        Ok(Command::Delete { element, index })
    }

    pub fn update(old: &Element, new: &Element) -> Self {
        Command::Update {
            element_id: old.id.clone(),
            old: old.clone(),
            new: Element {
                id: old.id.clone(),
                ..new.clone()
            },
        }
    }

    /// Record the current value at `path` and the value to set
    pub fn update_property(
        store: &ElementStore,
        id: &ElementId,
        path: &str,
        new_value: Value,
    ) -> CommandResult<Self> {
        let path = PropertyPath::parse(path)?;
        path.check(&new_value)?;
        let element = store
            .get_element_by_id(id)
            .ok_or_else(|| CommandError::ElementNotFound(id.clone()))?;

        Ok(Command::UpdateProperty {
            element_id: id.clone(),
            old_value: path.get(element),
            before: path.snapshot(element),
            path,
            new_value,
        })
    }

    pub fn batch(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Command::Batch {
            label: label.into(),
            commands,
        }
    }

    /// Apply the forward action. A missing target element is a no-op.
    pub fn execute(&self, store: &mut ElementStore) {
        match self {
            Command::Create { element } => {
                if !store.contains(&element.id) {
                    store.insert_element(element.clone());
                }
            }

            Command::Delete { element, .. } => {
                store.delete_element(&element.id);
            }

            Command::Update { element_id, new, .. } => {
                if let Some(current) = store.get_element_mut(element_id) {
                    *current = new.clone();
                }
            }

            Command::UpdateProperty {
                element_id,
                path,
                new_value,
                ..
            } => {
                if let Some(current) = store.get_element_mut(element_id) {
                    if let Err(err) = path.set(current, new_value.clone()) {
                        log::warn!("Skipping property update on {}: {}", element_id, err);
                    }
                }
            }

            Command::Batch { commands, .. } => {
                for command in commands {
                    command.execute(store);
                }
            }
        }
    }

    /// Apply the reverse action, restoring the pre-execution state
    pub fn undo(&self, store: &mut ElementStore) {
        match self {
            Command::Create { element } => {
                store.delete_element(&element.id);
            }

            Command::Delete { element, index } => {
                if !store.contains(&element.id) {
                    store.insert_element_at(*index, element.clone());
                }
            }

            Command::Update { element_id, old, .. } => {
                if let Some(current) = store.get_element_mut(element_id) {
                    *current = old.clone();
                }
            }

            Command::UpdateProperty {
                element_id,
                path,
                before,
                ..
            } => {
                if let Some(current) = store.get_element_mut(element_id) {
                    path.restore(current, before);
                }
            }

            Command::Batch { commands, .. } => {
                for command in commands.iter().rev() {
                    command.undo(store);
                }
            }
        }
    }

    /// True when executing would leave the store as it is
    pub fn is_noop(&self, store: &ElementStore) -> bool {
        match self {
            Command::Update { old, new, .. } => old == new,
            Command::UpdateProperty {
                element_id,
                path,
                new_value,
                ..
            } => store.get_element_by_id(element_id).is_some_and(|current| {
                let mut preview = current.clone();
                path.set(&mut preview, new_value.clone()).is_ok() && &preview == current
            }),
            Command::Batch { commands, .. } => commands.is_empty(),
            Command::Create { .. } | Command::Delete { .. } => false,
        }
    }

    /// Short human-readable name for history listings
    pub fn label(&self) -> &str {
        match self {
            Command::Create { .. } => "Create Element",
            Command::Delete { .. } => "Delete Element",
            Command::Update { .. } => "Update Element",
            Command::UpdateProperty { .. } => "Update Property",
            Command::Batch { label, .. } => label,
        }
    }

    /// Ids of the elements this command touches
    pub fn element_ids(&self) -> Vec<&ElementId> {
        match self {
            Command::Create { element } | Command::Delete { element, .. } => vec![&element.id],
            Command::Update { element_id, .. } | Command::UpdateProperty { element_id, .. } => {
                vec![element_id]
            }
            Command::Batch { commands, .. } => {
                commands.iter().flat_map(|c| c.element_ids()).collect()
            }
        }
    }
}
