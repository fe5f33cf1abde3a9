use prmsg_core::{SharedSessionState, SuppressChangeTrackingGuard};
use prmsg_page::{ElementId, PageDocument, SignalKind, SyntheticSignal};

const SPACE_KEY: &str = " ";
const SPACE_CODE: &str = "Space";
const SPACE_KEY_CODE: u32 = 32;

/// Write the composed message into the field, following the host UI's
/// acceptance quirks as an ordered contract.
///
/// The field must be focused before the value is assigned, or the host
/// restores the old message when the user next focuses the field. The
/// synthetic signals afterwards make the host register the change; without
/// them the message is reverted on submit.
pub fn write_commit_message(
    page: &dyn PageDocument,
    field: ElementId,
    state: &SharedSessionState,
    message: &str,
) {
    page.focus(field);
    page.set_field_value(field, message);
    send_signals_marking_field_changed(page, field, state);
    // Long messages would otherwise leave the cursor mid-document.
    page.set_selection_range(field, 0, 0);
}

fn send_signals_marking_field_changed(
    page: &dyn PageDocument,
    field: ElementId,
    state: &SharedSessionState,
) {
    dispatch_key_press(page, field, SPACE_KEY, SPACE_CODE, SPACE_KEY_CODE);

    // The input/change signals would register as a user edit; suppress
    // tracking for exactly their dispatch window.
    let _guard = SuppressChangeTrackingGuard::new(state);
    page.dispatch(field, &SyntheticSignal::input());
    page.dispatch(field, &SyntheticSignal::change());
}

fn dispatch_key_press(
    page: &dyn PageDocument,
    field: ElementId,
    key: &str,
    code: &str,
    key_code: u32,
) {
    for kind in [SignalKind::KeyDown, SignalKind::KeyPress, SignalKind::KeyUp] {
        page.dispatch(field, &SyntheticSignal::keyboard(kind, key, code, key_code));
    }
}
