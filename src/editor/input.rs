//! Pumping window input into the active session.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::mouse::MouseWheel;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::WindowFocused;
use bevy_egui::EguiContexts;

use crate::annotate::geometry::clamp_to_canvas;
use crate::annotate::{Command, EditorAction, EditorKey, Modifiers, Session, action_for_key};

use super::commands::SessionCommandRequest;
use super::params::{CanvasParams, egui_wants_keyboard, is_cursor_over_ui};
use super::source::ActiveSession;

/// Whether the engine saw the button go down, so a release can be matched.
#[derive(Default)]
pub struct PointerCapture {
    active: bool,
}

/// Keys the editor reacts to, by physical position.
pub fn editor_key(code: KeyCode) -> Option<EditorKey> {
    let key = match code {
        KeyCode::Escape => EditorKey::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => EditorKey::Enter,
        KeyCode::Backspace => EditorKey::Backspace,
        KeyCode::Delete => EditorKey::Delete,
        KeyCode::BracketLeft => EditorKey::BracketLeft,
        KeyCode::BracketRight => EditorKey::BracketRight,
        KeyCode::Digit0 => EditorKey::Digit(0),
        KeyCode::Digit1 => EditorKey::Digit(1),
        KeyCode::Digit2 => EditorKey::Digit(2),
        KeyCode::Digit3 => EditorKey::Digit(3),
        KeyCode::Digit4 => EditorKey::Digit(4),
        KeyCode::Digit5 => EditorKey::Digit(5),
        KeyCode::Digit6 => EditorKey::Digit(6),
        KeyCode::Digit7 => EditorKey::Digit(7),
        KeyCode::Digit8 => EditorKey::Digit(8),
        KeyCode::Digit9 => EditorKey::Digit(9),
        other => return letter(other).map(EditorKey::Letter),
    };
    Some(key)
}

fn letter(code: KeyCode) -> Option<char> {
    const LETTERS: [(KeyCode, char); 26] = [
        (KeyCode::KeyA, 'a'),
        (KeyCode::KeyB, 'b'),
        (KeyCode::KeyC, 'c'),
        (KeyCode::KeyD, 'd'),
        (KeyCode::KeyE, 'e'),
        (KeyCode::KeyF, 'f'),
        (KeyCode::KeyG, 'g'),
        (KeyCode::KeyH, 'h'),
        (KeyCode::KeyI, 'i'),
        (KeyCode::KeyJ, 'j'),
        (KeyCode::KeyK, 'k'),
        (KeyCode::KeyL, 'l'),
        (KeyCode::KeyM, 'm'),
        (KeyCode::KeyN, 'n'),
        (KeyCode::KeyO, 'o'),
        (KeyCode::KeyP, 'p'),
        (KeyCode::KeyQ, 'q'),
        (KeyCode::KeyR, 'r'),
        (KeyCode::KeyS, 's'),
        (KeyCode::KeyT, 't'),
        (KeyCode::KeyU, 'u'),
        (KeyCode::KeyV, 'v'),
        (KeyCode::KeyW, 'w'),
        (KeyCode::KeyX, 'x'),
        (KeyCode::KeyY, 'y'),
        (KeyCode::KeyZ, 'z'),
    ];
    LETTERS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, c)| *c)
}

fn modifiers(keyboard: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        ctrl: keyboard.any_pressed([
            KeyCode::ControlLeft,
            KeyCode::ControlRight,
            KeyCode::SuperLeft,
            KeyCode::SuperRight,
        ]),
        shift: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
    }
}

/// Left button drives begin/update/end of drags
pub fn handle_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    canvas: CanvasParams,
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveSession>,
    mut capture: Local<PointerCapture>,
) {
    let Some(session) = active.session.as_mut() else {
        capture.active = false;
        return;
    };
    let size = session.canvas_size();
    let snap = modifiers(&keyboard).shift;
    let cursor = canvas.cursor_canvas_pos(size);

    if mouse.just_pressed(MouseButton::Left) && !is_cursor_over_ui(&mut contexts) {
        if let Some(point) = cursor
            && point.cmpge(IVec2::ZERO).all()
            && point.cmplt(size).all()
        {
            session.begin_drag(point);
            capture.active = true;
        }
        return;
    }

    if !capture.active {
        return;
    }

    if mouse.just_released(MouseButton::Left) {
        capture.active = false;
        match cursor {
            Some(point) => session.end_drag(clamp_to_canvas(point, size.x, size.y), snap),
            None => session.end_drag_at_last_point(snap),
        }
        return;
    }

    if !mouse.pressed(MouseButton::Left) {
        // Release happened where we could not see it
        capture.active = false;
        session.end_drag_at_last_point(snap);
        return;
    }

    if let Some(point) = cursor {
        let point = clamp_to_canvas(point, size.x, size.y);
        if session.drag().is_some_and(|d| d.current != point) {
            session.update_drag(point, snap);
        }
    }
}

/// A drag cannot outlive window focus
pub fn handle_focus_loss(
    mut focus_events: MessageReader<WindowFocused>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut active: ResMut<ActiveSession>,
) {
    let lost_focus = focus_events.read().any(|e| !e.focused);
    if lost_focus
        && let Some(session) = active.session.as_mut()
        && session.is_dragging()
    {
        session.end_drag_at_last_point(modifiers(&keyboard).shift);
    }
}

/// Route one key press to the session. Shortcuts win; otherwise the key's
/// text goes to the shape being edited.
pub fn route_key_press(
    session: &mut Session,
    code: KeyCode,
    logical_key: &Key,
    repeat: bool,
    mods: Modifiers,
) -> Option<Command> {
    let editing = session.is_text_editing();
    if let Some(action) = editor_key(code).and_then(|key| action_for_key(key, mods, editing)) {
        // Holding a key only repeats deletion
        if repeat && action != EditorAction::Backspace {
            return None;
        }
        return session.apply(action);
    }

    if editing && !mods.ctrl {
        match logical_key {
            Key::Character(text) => {
                for c in text.chars() {
                    session.insert_char(c);
                }
            }
            Key::Space => {
                session.insert_char(' ');
            }
            _ => {}
        }
    }
    None
}

/// Shortcuts and typed characters, in the order they arrived
pub fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut key_events: MessageReader<KeyboardInput>,
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveSession>,
    mut requests: MessageWriter<SessionCommandRequest>,
) {
    if egui_wants_keyboard(&mut contexts) {
        key_events.clear();
        return;
    }
    let Some(session) = active.session.as_mut() else {
        key_events.clear();
        return;
    };
    let mods = modifiers(&keyboard);

    for event in key_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        if let Some(command) =
            route_key_press(session, event.key_code, &event.logical_key, event.repeat, mods)
        {
            requests.write(SessionCommandRequest(command));
        }
    }
}

/// Wheel up thickens the stroke, wheel down thins it
pub fn handle_wheel(
    mut wheel_events: MessageReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveSession>,
) {
    if is_cursor_over_ui(&mut contexts) {
        wheel_events.clear();
        return;
    }
    let Some(session) = active.session.as_mut() else {
        wheel_events.clear();
        return;
    };
    for event in wheel_events.read() {
        if event.y > 0.0 {
            session.thicker();
        } else if event.y < 0.0 {
            session.thinner();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{EngineSettings, FrozenFrame, Shape, Tool};
    use bevy::math::IRect;

    #[test]
    fn test_editor_key_mapping() {
        assert_eq!(editor_key(KeyCode::Escape), Some(EditorKey::Escape));
        assert_eq!(editor_key(KeyCode::NumpadEnter), Some(EditorKey::Enter));
        assert_eq!(editor_key(KeyCode::Digit8), Some(EditorKey::Digit(8)));
        assert_eq!(editor_key(KeyCode::KeyV), Some(EditorKey::Letter('v')));
        assert_eq!(editor_key(KeyCode::BracketRight), Some(EditorKey::BracketRight));
        assert_eq!(editor_key(KeyCode::F5), None);
    }

    #[test]
    fn test_modifiers_from_keyboard() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ControlLeft);
        keyboard.press(KeyCode::ShiftRight);
        assert_eq!(
            modifiers(&keyboard),
            Modifiers {
                ctrl: true,
                shift: true
            }
        );
    }

    fn editing_session() -> Session {
        let frame = FrozenFrame::from_rgba_image(image::RgbaImage::new(100, 50));
        let mut session =
            Session::begin(IRect::new(0, 0, 100, 50), frame, EngineSettings::default()).unwrap();
        session.set_tool(Tool::Text);
        session.begin_drag(IVec2::new(5, 5));
        assert!(session.is_text_editing());
        session
    }

    fn press(session: &mut Session, code: KeyCode, logical_key: Key) -> Option<Command> {
        route_key_press(session, code, &logical_key, false, Modifiers::default())
    }

    fn text_of(session: &Session) -> &str {
        match &session.shapes()[0].shape {
            Shape::Text { content, .. } => content,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_character_before_enter_is_kept() {
        let mut session = editing_session();
        press(&mut session, KeyCode::KeyX, Key::Character("x".into()));
        press(&mut session, KeyCode::Enter, Key::Enter);

        assert_eq!(text_of(&session), "x");
        assert!(!session.is_text_editing());
    }

    #[test]
    fn test_backspace_applies_in_arrival_order() {
        let mut session = editing_session();
        press(&mut session, KeyCode::KeyA, Key::Character("a".into()));
        press(&mut session, KeyCode::KeyB, Key::Character("b".into()));
        press(&mut session, KeyCode::Backspace, Key::Backspace);
        press(&mut session, KeyCode::Space, Key::Space);

        assert_eq!(text_of(&session), "a ");
    }

    #[test]
    fn test_tool_letters_type_while_editing() {
        let mut session = editing_session();
        press(&mut session, KeyCode::KeyV, Key::Character("V".into()));
        assert_eq!(text_of(&session), "V");
        assert_eq!(session.tool(), Tool::Text);
    }

    #[test]
    fn test_repeat_does_not_retrigger_shortcuts() {
        let mut session = editing_session();
        press(&mut session, KeyCode::Escape, Key::Escape);
        assert!(!session.is_text_editing());

        let ctrl = Modifiers {
            ctrl: true,
            shift: false,
        };
        let copy = Key::Character("c".into());
        assert_eq!(
            route_key_press(&mut session, KeyCode::KeyC, &copy, false, ctrl),
            Some(Command::Copy)
        );
        assert_eq!(route_key_press(&mut session, KeyCode::KeyC, &copy, true, ctrl), None);
    }
}
