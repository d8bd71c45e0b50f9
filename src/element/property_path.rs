use serde_json::Value;
use thiserror::Error;

use super::{Dimension, Element, finite_f32};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("Property path is empty")]
    Empty,

    #[error("Property path `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("Unknown property path `{0}`")]
    UnknownRoot(String),

    #[error("Value for `{path}` must be {expected}")]
    TypeMismatch { path: String, expected: &'static str },
}

/// Which part of an element a path addresses
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyRoot {
    PositionTop,
    PositionLeft,
    SizeWidth,
    SizeHeight,
    ZIndex,
    /// `properties.<key>[.<nested>...]`, never empty
    Properties(Vec<String>),
}

/// A dotted path to one value inside an element, e.g. `position.top` or
/// `properties.fontSize`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPath {
    raw: String,
    root: PropertyRoot,
}

/// State of the top-level slot a path writes into, captured so that a
/// write can be reverted exactly even when it created nested objects.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSnapshot {
    Scalar(Value),
    Entry { key: String, value: Option<Value> },
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::EmptySegment(path.to_owned()));
        }

        let root = match segments.as_slice() {
            ["position", "top"] => PropertyRoot::PositionTop,
            ["position", "left"] => PropertyRoot::PositionLeft,
            ["size", "width"] => PropertyRoot::SizeWidth,
            ["size", "height"] => PropertyRoot::SizeHeight,
            ["zIndex"] => PropertyRoot::ZIndex,
            ["properties", rest @ ..] if !rest.is_empty() => {
                PropertyRoot::Properties(rest.iter().map(|s| (*s).to_owned()).collect())
            }
            _ => return Err(PathError::UnknownRoot(path.to_owned())),
        };

        Ok(Self {
            raw: path.to_owned(),
            root,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn root(&self) -> &PropertyRoot {
        &self.root
    }

    /// Current value at this path, `null` when a nested key is missing
    pub fn get(&self, element: &Element) -> Value {
        match &self.root {
            PropertyRoot::PositionTop => Value::from(element.position.top),
            PropertyRoot::PositionLeft => Value::from(element.position.left),
            PropertyRoot::SizeWidth => Value::from(element.size.width),
            PropertyRoot::SizeHeight => Value::from(element.size.height),
            PropertyRoot::ZIndex => Value::from(element.z_index),
            PropertyRoot::Properties(keys) => {
                let mut current = element.properties.get(&keys[0]);
                for key in &keys[1..] {
                    current = current.and_then(|v| v.get(key));
                }
                current.cloned().unwrap_or(Value::Null)
            }
        }
    }

    /// Reject values the typed roots cannot hold
    pub fn check(&self, value: &Value) -> Result<(), PathError> {
        let ok = match &self.root {
            PropertyRoot::PositionTop | PropertyRoot::PositionLeft => {
                value.as_f64().and_then(finite_f32).is_some()
            }
            PropertyRoot::SizeWidth | PropertyRoot::SizeHeight => {
                Dimension::try_from(value.clone()).is_ok()
            }
            PropertyRoot::ZIndex => value.as_i64().is_some_and(|z| i32::try_from(z).is_ok()),
            PropertyRoot::Properties(_) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(PathError::TypeMismatch {
                path: self.raw.clone(),
                expected: self.expected(),
            })
        }
    }

    fn expected(&self) -> &'static str {
        match self.root {
            PropertyRoot::PositionTop | PropertyRoot::PositionLeft => "a finite number",
            PropertyRoot::SizeWidth | PropertyRoot::SizeHeight => {
                "a finite number, \"auto\" or a percentage"
            }
            PropertyRoot::ZIndex => "an integer",
            PropertyRoot::Properties(_) => "any JSON value",
        }
    }

    /// Write `value` at this path, creating intermediate objects as needed
    pub fn set(&self, element: &mut Element, value: Value) -> Result<(), PathError> {
        self.check(&value)?;
        let mismatch = || PathError::TypeMismatch {
            path: self.raw.clone(),
            expected: self.expected(),
        };

        match &self.root {
            PropertyRoot::PositionTop => {
                element.position.top = value.as_f64().and_then(finite_f32).ok_or_else(mismatch)?;
            }
            PropertyRoot::PositionLeft => {
                element.position.left = value.as_f64().and_then(finite_f32).ok_or_else(mismatch)?;
            }
            PropertyRoot::SizeWidth => {
                element.size.width = Dimension::try_from(value).map_err(|_| mismatch())?;
            }
            PropertyRoot::SizeHeight => {
                element.size.height = Dimension::try_from(value).map_err(|_| mismatch())?;
            }
            PropertyRoot::ZIndex => {
                let z = value.as_i64().and_then(|z| i32::try_from(z).ok());
                element.z_index = z.ok_or_else(mismatch)?;
            }
            PropertyRoot::Properties(keys) => {
                let (last, parents) = keys.split_last().ok_or(PathError::Empty)?;
                let mut map = &mut element.properties;
                for key in parents {
                    let slot = map
                        .entry(key.clone())
                        .or_insert_with(|| Value::Object(Default::default()));
                    if !slot.is_object() {
                        *slot = Value::Object(Default::default());
                    }
                    map = match slot {
                        Value::Object(inner) => inner,
                        _ => return Err(mismatch()),
                    };
                }
                map.insert(last.clone(), value);
            }
        }
        Ok(())
    }

    /// Capture what [`PropertyPath::restore`] needs to undo a write
    pub fn snapshot(&self, element: &Element) -> PathSnapshot {
        match &self.root {
            PropertyRoot::Properties(keys) => PathSnapshot::Entry {
                key: keys[0].clone(),
                value: element.properties.get(&keys[0]).cloned(),
            },
            _ => PathSnapshot::Scalar(self.get(element)),
        }
    }

    pub fn restore(&self, element: &mut Element, snapshot: &PathSnapshot) {
        match snapshot {
            PathSnapshot::Scalar(value) => {
                if let Err(err) = self.set(element, value.clone()) {
                    log::warn!("Could not restore {}: {}", self.raw, err);
                }
            }
            PathSnapshot::Entry { key, value: Some(value) } => {
                element.properties.insert(key.clone(), value.clone());
            }
            PathSnapshot::Entry { key, value: None } => {
                element.properties.remove(key);
            }
        }
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementId, ElementKind, Position};
    use serde_json::json;

    fn text_element() -> Element {
        Element::new(ElementId::from("el-1"), ElementKind::Text, Position::new(10.0, 20.0))
    }

    #[test]
    fn parses_known_roots() {
        assert_eq!(
            PropertyPath::parse("position.top").unwrap().root(),
            &PropertyRoot::PositionTop
        );
        assert_eq!(PropertyPath::parse("zIndex").unwrap().root(), &PropertyRoot::ZIndex);
        assert_eq!(
            PropertyPath::parse("properties.font.size").unwrap().root(),
            &PropertyRoot::Properties(vec!["font".into(), "size".into()])
        );
    }

    #[test]
    fn rejects_bad_paths() {
        assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            PropertyPath::parse("properties..x"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(PropertyPath::parse("properties"), Err(PathError::UnknownRoot(_))));
        assert!(matches!(PropertyPath::parse("id"), Err(PathError::UnknownRoot(_))));
    }

    #[test]
    fn set_creates_nested_objects() {
        let mut element = text_element();
        let path = PropertyPath::parse("properties.shadow.blur").unwrap();
        assert_eq!(path.get(&element), Value::Null);

        path.set(&mut element, json!(4)).unwrap();
        assert_eq!(element.properties["shadow"], json!({ "blur": 4 }));
        assert_eq!(path.get(&element), json!(4));
    }

    #[test]
    fn typed_roots_reject_wrong_values() {
        let mut element = text_element();
        let top = PropertyPath::parse("position.top").unwrap();
        assert!(top.set(&mut element, json!("high")).is_err());
        assert_eq!(element.position.top, 10.0);

        let width = PropertyPath::parse("size.width").unwrap();
        width.set(&mut element, json!("50%")).unwrap();
        assert_eq!(element.size.width, Dimension::Percent(50.0));
    }

    #[test]
    fn typed_roots_reject_values_outside_f32() {
        let mut element = text_element();
        let top = PropertyPath::parse("position.top").unwrap();
        assert!(matches!(top.check(&json!(1e39)), Err(PathError::TypeMismatch { .. })));
        assert!(top.set(&mut element, json!(-1e39)).is_err());
        assert_eq!(element.position.top, 10.0);

        let height = PropertyPath::parse("size.height").unwrap();
        assert!(height.check(&json!(1e39)).is_err());
        assert!(height.check(&json!("inf%")).is_err());
        assert!(height.check(&json!("NaN%")).is_err());
        assert!(height.check(&json!(120)).is_ok());
    }

    #[test]
    fn restore_reverts_created_entries() {
        let mut element = text_element();
        let before = element.clone();
        let path = PropertyPath::parse("properties.shadow.blur").unwrap();
        let snapshot = path.snapshot(&element);

        path.set(&mut element, json!(8)).unwrap();
        path.restore(&mut element, &snapshot);
        assert_eq!(element, before);
    }
}
