use bevy::window::{CursorIcon, SystemCursorIcon};

use super::model::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    Select,
    #[default]
    Rect,
    Line,
    Arrow,
    Pencil,
    Text,
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Select => "Select (V)",
            Tool::Rect => "Rect (Shift+1)",
            Tool::Line => "Line (Shift+2)",
            Tool::Arrow => "Arrow (Shift+3)",
            Tool::Pencil => "Pencil (Shift+5)",
            Tool::Text => "Text (Shift+8)",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rect => "Rect",
            Tool::Line => "Line",
            Tool::Arrow => "Arrow",
            Tool::Pencil => "Pencil",
            Tool::Text => "Text",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Tool::Select => CursorIcon::System(SystemCursorIcon::Default),
            Tool::Text => CursorIcon::System(SystemCursorIcon::Text),
            Tool::Rect | Tool::Line | Tool::Arrow | Tool::Pencil => {
                CursorIcon::System(SystemCursorIcon::Crosshair)
            }
        }
    }

    pub fn all() -> &'static [Tool] {
        &[
            Tool::Select,
            Tool::Rect,
            Tool::Line,
            Tool::Arrow,
            Tool::Pencil,
            Tool::Text,
        ]
    }

    /// Whether shapes of `kind` can be picked while this tool is active.
    /// Select picks any kind; other tools only pick their own.
    pub fn allows(&self, kind: ShapeKind) -> bool {
        match self {
            Tool::Select => true,
            Tool::Rect => kind == ShapeKind::Rect,
            Tool::Line => kind == ShapeKind::Line,
            Tool::Arrow => kind == ShapeKind::Arrow,
            Tool::Pencil => kind == ShapeKind::Pencil,
            Tool::Text => kind == ShapeKind::Text,
        }
    }
}

/// What an active pointer drag is doing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    CreateRect,
    CreateLine,
    CreateArrow,
    CreatePencil,
    MoveRect,
    ResizeRectTL,
    ResizeRectTR,
    ResizeRectBL,
    ResizeRectBR,
    MoveLine,
    MoveLineStart,
    MoveLineEnd,
    MoveText,
}

impl DragMode {
    /// Cursor shown while hovering a shape part that would start this drag.
    pub fn cursor_icon(&self) -> Option<CursorIcon> {
        match self {
            DragMode::None
            | DragMode::CreateRect
            | DragMode::CreateLine
            | DragMode::CreateArrow
            | DragMode::CreatePencil => None,
            DragMode::MoveRect | DragMode::MoveLine | DragMode::MoveText => {
                Some(CursorIcon::System(SystemCursorIcon::Move))
            }
            DragMode::ResizeRectTL | DragMode::ResizeRectBR => {
                Some(CursorIcon::System(SystemCursorIcon::NwseResize))
            }
            DragMode::ResizeRectTR | DragMode::ResizeRectBL => {
                Some(CursorIcon::System(SystemCursorIcon::NeswResize))
            }
            DragMode::MoveLineStart | DragMode::MoveLineEnd => {
                Some(CursorIcon::System(SystemCursorIcon::Crosshair))
            }
        }
    }

    /// Modes whose pointer is constrained to 45-degree steps while the snap
    /// modifier is held.
    pub fn snaps(&self) -> bool {
        matches!(
            self,
            DragMode::CreateLine
                | DragMode::CreateArrow
                | DragMode::MoveLineStart
                | DragMode::MoveLineEnd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_rect() {
        assert_eq!(Tool::default(), Tool::Rect);
    }

    #[test]
    fn test_display_names_contain_shortcuts() {
        // Each display name should contain its keyboard shortcut in parentheses
        for tool in Tool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
            assert!(name.starts_with(tool.label()));
        }
    }

    #[test]
    fn test_select_allows_every_kind() {
        for kind in [
            ShapeKind::Rect,
            ShapeKind::Line,
            ShapeKind::Arrow,
            ShapeKind::Pencil,
            ShapeKind::Text,
        ] {
            assert!(Tool::Select.allows(kind));
        }
        assert!(Tool::Arrow.allows(ShapeKind::Arrow));
        assert!(!Tool::Arrow.allows(ShapeKind::Line));
        assert!(!Tool::Text.allows(ShapeKind::Rect));
    }

    #[test]
    fn test_text_tool_has_text_cursor() {
        assert_eq!(
            Tool::Text.cursor_icon(),
            CursorIcon::System(SystemCursorIcon::Text)
        );
    }

    #[test]
    fn test_drag_mode_default() {
        assert_eq!(DragMode::default(), DragMode::None);
        assert!(DragMode::None.cursor_icon().is_none());
    }

    #[test]
    fn test_resize_cursors_follow_diagonal() {
        assert_eq!(
            DragMode::ResizeRectTL.cursor_icon(),
            Some(CursorIcon::System(SystemCursorIcon::NwseResize))
        );
        assert_eq!(
            DragMode::ResizeRectBL.cursor_icon(),
            Some(CursorIcon::System(SystemCursorIcon::NeswResize))
        );
    }

    #[test]
    fn test_snapping_modes() {
        assert!(DragMode::CreateArrow.snaps());
        assert!(DragMode::MoveLineEnd.snaps());
        assert!(!DragMode::MoveLine.snaps());
        assert!(!DragMode::CreateRect.snaps());
    }
}
