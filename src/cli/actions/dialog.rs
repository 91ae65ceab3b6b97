use crate::cli::actions::session::print_json;
use crate::dialog::DialogState;
use anyhow::Result;

/// Prints the descriptor a delete confirmation would publish.
///
/// # Errors
/// Returns an error if the descriptor cannot be serialized.
pub fn confirm_delete(title: &str, description: &str) -> Result<()> {
    let dialog = DialogState::new();
    dialog.confirm_delete(title, description);
    print_json(&serde_json::to_value(dialog.descriptor())?)
}
