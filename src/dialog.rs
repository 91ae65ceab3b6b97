//! Global dialog state. One descriptor names the dialog to show and the props
//! it receives; listeners observe changes through a watch channel.

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogComponent {
    ConfirmDelete,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DialogDescriptor {
    pub title: String,
    pub component: Option<DialogComponent>,
    pub props: Map<String, Value>,
}

#[derive(Debug)]
pub struct DialogState {
    descriptor: watch::Sender<DialogDescriptor>,
}

impl Default for DialogState {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogState {
    #[must_use]
    pub fn new() -> Self {
        let (descriptor, _) = watch::channel(DialogDescriptor::default());
        Self { descriptor }
    }

    #[must_use]
    pub fn descriptor(&self) -> DialogDescriptor {
        self.descriptor.borrow().clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.descriptor.borrow().component.is_some()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DialogDescriptor> {
        self.descriptor.subscribe()
    }

    /// Requests a delete confirmation showing `description`.
    pub fn confirm_delete(&self, title: &str, description: &str) {
        let mut props = Map::new();
        props.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );

        self.descriptor.send_replace(DialogDescriptor {
            title: title.to_string(),
            component: Some(DialogComponent::ConfirmDelete),
            props,
        });
    }

    pub fn dismiss(&self) {
        self.descriptor.send_replace(DialogDescriptor::default());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_closed() {
        let dialog = DialogState::new();
        assert!(!dialog.is_open());
        assert_eq!(dialog.descriptor(), DialogDescriptor::default());
    }

    #[test]
    fn confirm_delete_sets_descriptor() {
        let dialog = DialogState::new();
        dialog.confirm_delete("Delete envelope", "This cannot be undone.");

        let descriptor = dialog.descriptor();
        assert!(dialog.is_open());
        assert_eq!(descriptor.title, "Delete envelope");
        assert_eq!(descriptor.component, Some(DialogComponent::ConfirmDelete));
        assert_eq!(
            Value::Object(descriptor.props),
            json!({"description": "This cannot be undone."})
        );
    }

    #[test]
    fn descriptor_serializes_for_consumers() {
        let dialog = DialogState::new();
        dialog.confirm_delete("Delete", "Sure?");

        assert_eq!(
            serde_json::to_value(dialog.descriptor()).unwrap(),
            json!({
                "title": "Delete",
                "component": "confirm-delete",
                "props": {"description": "Sure?"}
            })
        );
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let dialog = DialogState::new();
        let mut updates = dialog.subscribe();

        dialog.confirm_delete("Delete", "Sure?");
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().title, "Delete");

        dialog.dismiss();
        updates.changed().await.unwrap();
        assert!(updates.borrow_and_update().component.is_none());
    }
}
