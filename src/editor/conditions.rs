//! Run conditions for controlling when editor systems execute.

use bevy::prelude::*;

use crate::ui::DialogState;

use super::source::ActiveSession;

/// Run condition: returns true while a screenshot is being annotated.
///
/// Usage: `.run_if(session_is_active)`
pub fn session_is_active(active: Res<ActiveSession>) -> bool {
    active.session.is_some()
}

/// Run condition: returns true when no modal dialog is open.
///
/// Use this to prevent editor input handlers from processing when
/// the user is interacting with a dialog.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}
