use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broadcast after every successful cart mutation.
///
/// Listeners treat any event as "cart changed" and re-read through the
/// manager; the payload is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEvent {
    pub kind: CartEventKind,
    pub occurred_at: DateTime<Utc>,
}

impl CartEvent {
    pub fn new(kind: CartEventKind) -> Self {
        Self {
            kind,
            occurred_at: Utc::now(),
        }
    }

    /// Cart id the event refers to, `None` for [`CartEventKind::Cleared`].
    pub fn cart_id(&self) -> Option<&str> {
        match &self.kind {
            CartEventKind::Created { cart_id, .. }
            | CartEventKind::LinesAdded { cart_id, .. }
            | CartEventKind::LinesUpdated { cart_id, .. }
            | CartEventKind::LinesRemoved { cart_id, .. } => Some(cart_id),
            CartEventKind::Cleared => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEventKind {
    /// A new remote cart was created and its id persisted.
    Created { cart_id: String, total_quantity: u32 },
    LinesAdded { cart_id: String, total_quantity: u32 },
    LinesUpdated { cart_id: String, total_quantity: u32 },
    LinesRemoved { cart_id: String, total_quantity: u32 },
    /// The persisted cart id was dropped.
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag() {
        let event = CartEvent::new(CartEventKind::LinesAdded {
            cart_id: "c1".into(),
            total_quantity: 2,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "lines_added");
        assert_eq!(event.cart_id(), Some("c1"));
        assert_eq!(CartEvent::new(CartEventKind::Cleared).cart_id(), None);
    }
}
