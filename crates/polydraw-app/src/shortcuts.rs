//! Keyboard shortcut registry and dispatch.

use crate::ui::UiAction;
use egui::{Context, Key, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    action: UiAction,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: UiAction,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    pub fn action(&self) -> UiAction {
        self.action.clone()
    }

    fn modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::NONE;
        if self.ctrl {
            modifiers = modifiers | Modifiers::COMMAND;
        }
        if self.shift {
            modifiers = modifiers | Modifiers::SHIFT;
        }
        modifiers
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    ///
    /// Shift variants come before their plain counterparts so they are matched
    /// first.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::S, true, true, "Save sketch locally", UiAction::SaveSketch),
            Shortcut::new(Key::S, true, false, "Save drawing to file", UiAction::SaveDrawing),
            Shortcut::new(Key::O, true, true, "Load local sketch", UiAction::LoadSketch),
            Shortcut::new(Key::O, true, false, "Import drawing", UiAction::ImportDrawing),
            Shortcut::new(Key::E, true, true, "Copy drawing as PNG", UiAction::CopyPng),
            Shortcut::new(Key::E, true, false, "Export to PNG", UiAction::ExportPng),
            Shortcut::new(Key::Z, true, false, "Delete last point", UiAction::DeleteLastPoint),
            Shortcut::new(
                Key::Backspace,
                false,
                false,
                "Delete last point",
                UiAction::DeleteLastPoint,
            ),
            Shortcut::new(Key::Delete, true, true, "Clear canvas", UiAction::ClearCanvas),
            Shortcut::new(
                Key::L,
                false,
                false,
                "Toggle measurement labels",
                UiAction::ToggleLabels,
            ),
            Shortcut::new(
                Key::F1,
                false,
                false,
                "Show keyboard shortcuts",
                UiAction::ToggleShortcuts,
            ),
        ]
    }

    /// Consume the first matching shortcut pressed this frame.
    pub fn dispatch(ctx: &Context) -> Option<UiAction> {
        // Text fields own the keyboard while focused.
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input_mut(|input| {
            Self::all()
                .into_iter()
                .find(|s| input.consume_key(s.modifiers(), s.key))
                .map(|s| s.action())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let s = Shortcut::new(Key::E, true, true, "Copy", UiAction::CopyPng);
        assert_eq!(s.format(), "Ctrl+Shift+E");
        let s = Shortcut::new(Key::L, false, false, "Labels", UiAction::ToggleLabels);
        assert_eq!(s.format(), "L");
    }

    #[test]
    fn test_shift_variants_first() {
        let all = ShortcutRegistry::all();
        for (i, s) in all.iter().enumerate() {
            if !s.shift {
                let shadowed = all[i + 1..]
                    .iter()
                    .any(|later| later.key == s.key && later.ctrl == s.ctrl && later.shift);
                assert!(!shadowed, "{} is listed before its Shift variant", s.format());
            }
        }
    }
}
