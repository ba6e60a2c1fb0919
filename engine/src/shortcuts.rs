//! Keyboard bindings for the three navigation commands.

use crate::config::KeyBindings;
use crate::navigation::Command;
use crate::page::FocusContext;

/// A key press as seen by the page-wide listener.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// `KeyboardEvent.key`.
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub focus: FocusContext,
}

impl KeyPress {
    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

pub struct ShortcutDispatcher {
    bindings: [(String, Command); 3],
}

impl ShortcutDispatcher {
    pub fn new(keys: &KeyBindings) -> Self {
        Self {
            bindings: [
                (keys.previous.to_lowercase(), Command::Previous),
                (keys.replay.to_lowercase(), Command::Replay),
                (keys.next.to_lowercase(), Command::Next),
            ],
        }
    }

    /// Command bound to `press`, or `None` when the press should reach the page
    /// untouched: typing into a text field, holding ctrl/meta/alt, or an unbound key.
    pub fn command_for(&self, press: &KeyPress) -> Option<Command> {
        if press.focus.is_text_entry() || press.has_modifier() {
            return None;
        }
        let key = press.key.to_lowercase();
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str) -> KeyPress {
        KeyPress {
            key: key.to_string(),
            focus: FocusContext { tag_name: "body".into(), ..Default::default() },
            ..Default::default()
        }
    }

    fn dispatcher() -> ShortcutDispatcher {
        ShortcutDispatcher::new(&KeyBindings::default())
    }

    #[test]
    fn test_default_bindings() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.command_for(&press("a")), Some(Command::Previous));
        assert_eq!(dispatcher.command_for(&press("s")), Some(Command::Replay));
        assert_eq!(dispatcher.command_for(&press("d")), Some(Command::Next));
        assert_eq!(dispatcher.command_for(&press("f")), None);
        assert_eq!(dispatcher.command_for(&press("ArrowLeft")), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(dispatcher().command_for(&press("D")), Some(Command::Next));

        let custom = ShortcutDispatcher::new(&KeyBindings {
            previous: "J".into(),
            replay: "k".into(),
            next: "L".into(),
        });
        assert_eq!(custom.command_for(&press("j")), Some(Command::Previous));
        assert_eq!(custom.command_for(&press("l")), Some(Command::Next));
    }

    #[test]
    fn test_modifiers_are_ignored() {
        let dispatcher = dispatcher();
        for modified in [
            KeyPress { ctrl: true, ..press("a") },
            KeyPress { meta: true, ..press("s") },
            KeyPress { alt: true, ..press("d") },
        ] {
            assert_eq!(dispatcher.command_for(&modified), None);
        }
    }

    #[test]
    fn test_text_entry_is_ignored() {
        let dispatcher = dispatcher();
        let in_field = |focus: FocusContext| KeyPress { focus, ..press("d") };

        assert_eq!(
            dispatcher.command_for(&in_field(FocusContext { tag_name: "input".into(), ..Default::default() })),
            None
        );
        assert_eq!(
            dispatcher.command_for(&in_field(FocusContext { tag_name: "textarea".into(), ..Default::default() })),
            None
        );
        assert_eq!(
            dispatcher.command_for(&in_field(FocusContext {
                tag_name: "div".into(),
                is_content_editable: true,
                ..Default::default()
            })),
            None
        );
        assert_eq!(
            dispatcher.command_for(&in_field(FocusContext {
                tag_name: "span".into(),
                inside_content_editable: true,
                ..Default::default()
            })),
            None
        );
    }
}
