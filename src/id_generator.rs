use uuid::Uuid;

use crate::element::ElementId;

const ID_PREFIX: &str = "element-";

/// Fresh, globally unique element id
pub fn generate_id() -> ElementId {
    ElementId::new(format!("{}{}", ID_PREFIX, Uuid::new_v4().simple()))
}
