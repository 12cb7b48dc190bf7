//! Keyboard shortcuts for undo/redo.
//!
//! Bindings are active only while a canvas is mounted. The undo/redo
//! targets are passed in on each call rather than looked up globally.

use crate::input::{KeyEvent, KeyTarget};

/// Undo/redo capability handed to the shortcut handler.
pub trait HistoryCommands {
    /// Returns true if something was undone.
    fn undo(&mut self) -> bool;
    /// Returns true if something was redone.
    fn redo(&mut self) -> bool;
    /// Whether the target has its own text entry open. Keys then belong to
    /// that entry and shortcuts stay quiet.
    fn is_text_editing(&self) -> bool {
        false
    }
}

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub shift: bool,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub const fn new(key: &'static str, shift: bool, action: ShortcutAction) -> Self {
        Self { key, shift, action }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = vec!["Ctrl"];
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        event.modifiers.platform()
            && event.modifiers.shift == self.shift
            && event.key.eq_ignore_ascii_case(self.key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", false, ShortcutAction::Undo),
            Shortcut::new("Z", true, ShortcutAction::Redo),
            Shortcut::new("Y", false, ShortcutAction::Redo),
            Shortcut::new("Y", true, ShortcutAction::Redo),
        ]
    }
}

/// Document-level shortcut listener scoped to a mounted canvas.
#[derive(Debug, Clone, Default)]
pub struct KeyboardShortcuts {
    mounted: bool,
}

impl KeyboardShortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening; call when the canvas mounts.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Stop listening; call when the canvas unmounts.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// The action bound to `event`, if any. Events typed into text fields
    /// never trigger shortcuts.
    pub fn action_for(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        if !self.mounted || event.target == KeyTarget::TextField {
            return None;
        }
        ShortcutRegistry::all()
            .into_iter()
            .find(|s| s.matches(event))
            .map(|s| s.action)
    }

    /// Dispatch `event` to `commands`. Returns true if the event was
    /// consumed, in which case the host should suppress its default.
    pub fn handle(&self, event: &KeyEvent, commands: &mut impl HistoryCommands) -> bool {
        if commands.is_text_editing() {
            return false;
        }
        match self.action_for(event) {
            Some(ShortcutAction::Undo) => {
                commands.undo();
                true
            }
            Some(ShortcutAction::Redo) => {
                commands.redo();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[derive(Default)]
    struct Recorder {
        undos: usize,
        redos: usize,
        typing: bool,
    }

    impl HistoryCommands for Recorder {
        fn undo(&mut self) -> bool {
            self.undos += 1;
            true
        }

        fn redo(&mut self) -> bool {
            self.redos += 1;
            true
        }

        fn is_text_editing(&self) -> bool {
            self.typing
        }
    }

    fn ctrl(shift: bool) -> Modifiers {
        Modifiers {
            ctrl: true,
            shift,
            ..Default::default()
        }
    }

    fn mounted() -> KeyboardShortcuts {
        let mut shortcuts = KeyboardShortcuts::new();
        shortcuts.mount();
        shortcuts
    }

    #[test]
    fn test_bindings() {
        let shortcuts = mounted();
        assert_eq!(shortcuts.action_for(&KeyEvent::new("z", ctrl(false))), Some(ShortcutAction::Undo));
        assert_eq!(shortcuts.action_for(&KeyEvent::new("Z", ctrl(true))), Some(ShortcutAction::Redo));
        assert_eq!(shortcuts.action_for(&KeyEvent::new("y", ctrl(false))), Some(ShortcutAction::Redo));
        let cmd = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(shortcuts.action_for(&KeyEvent::new("z", cmd)), Some(ShortcutAction::Undo));
    }

    #[test]
    fn test_requires_platform_modifier() {
        let shortcuts = mounted();
        assert_eq!(shortcuts.action_for(&KeyEvent::new("z", Modifiers::default())), None);
        assert_eq!(shortcuts.action_for(&KeyEvent::new("x", ctrl(false))), None);
    }

    #[test]
    fn test_ignored_in_text_field() {
        let shortcuts = mounted();
        let mut recorder = Recorder::default();
        let event = KeyEvent::new("z", ctrl(false)).in_text_field();
        assert!(!shortcuts.handle(&event, &mut recorder));
        assert_eq!(recorder.undos, 0);
    }

    #[test]
    fn test_ignored_while_target_edits_text() {
        let shortcuts = mounted();
        let mut recorder = Recorder {
            typing: true,
            ..Default::default()
        };
        assert!(!shortcuts.handle(&KeyEvent::new("z", ctrl(false)), &mut recorder));
        assert!(!shortcuts.handle(&KeyEvent::new("y", ctrl(false)), &mut recorder));
        assert_eq!((recorder.undos, recorder.redos), (0, 0));
    }

    #[test]
    fn test_inactive_until_mounted() {
        let mut shortcuts = KeyboardShortcuts::new();
        let mut recorder = Recorder::default();
        let event = KeyEvent::new("z", ctrl(false));
        assert!(!shortcuts.handle(&event, &mut recorder));
        shortcuts.mount();
        assert!(shortcuts.handle(&event, &mut recorder));
        shortcuts.unmount();
        assert!(!shortcuts.handle(&event, &mut recorder));
        assert_eq!(recorder.undos, 1);
    }

    #[test]
    fn test_dispatches_redo() {
        let shortcuts = mounted();
        let mut recorder = Recorder::default();
        shortcuts.handle(&KeyEvent::new("z", ctrl(true)), &mut recorder);
        shortcuts.handle(&KeyEvent::new("y", ctrl(false)), &mut recorder);
        assert_eq!(recorder.redos, 2);
        assert_eq!(recorder.undos, 0);
    }

    #[test]
    fn test_format() {
        let all = ShortcutRegistry::all();
        assert_eq!(all[0].format(), "Ctrl+Z");
        assert_eq!(all[1].format(), "Ctrl+Shift+Z");
    }
}
