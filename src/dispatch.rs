use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Whether table keys are taken away from a focused text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortcutMode {
    /// Every table key is intercepted, even while typing.
    #[default]
    Global,
    /// Table keys reach the focused field; shortcuts work once focus is released.
    SuspendWhileEditing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Timestamp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitCreate,
    Focus(FormField),
    /// Open the delete confirmation for the note at this position.
    OpenDelete(usize),
    /// Open the update dialog for the note at this position.
    OpenUpdate(usize),
    ClearDraft,
    ShiftDate(i64),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The key is a shortcut and must not reach text entry. `None` means its guard failed.
    Consumed(Option<Command>),
    PassThrough,
}

pub fn command_for(ch: char) -> Option<Command> {
    let command = match ch {
        'p' => Command::SubmitCreate,
        '/' => Command::Focus(FormField::Title),
        'd' => Command::Focus(FormField::Description),
        't' => Command::Focus(FormField::Timestamp),
        '1' => Command::OpenDelete(0),
        '2' => Command::OpenDelete(1),
        'u' => Command::OpenUpdate(0),
        'c' => Command::ClearDraft,
        'n' => Command::ShiftDate(1),
        'b' => Command::ShiftDate(-1),
        _ => return None,
    };
    Some(command)
}

impl Command {
    /// Positional commands only fire when the collection has an entry at that index.
    fn allowed(&self, note_count: usize) -> bool {
        match self {
            Command::OpenDelete(idx) | Command::OpenUpdate(idx) => *idx < note_count,
            _ => true,
        }
    }
}

/// The view's single key listener. It owns no state besides its mode: guards are
/// evaluated against whatever collection is current when the key arrives.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: ShortcutMode,
}

impl Dispatcher {
    pub fn new(mode: ShortcutMode) -> Self {
        Dispatcher { mode }
    }

    pub fn mode(&self) -> ShortcutMode {
        self.mode
    }

    pub fn dispatch(&self, key: &KeyEvent, note_count: usize, editing: bool) -> Dispatch {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Dispatch::PassThrough;
        }
        let command = match key.code {
            KeyCode::Char(ch) => match command_for(ch) {
                Some(command) => command,
                None => return Dispatch::PassThrough,
            },
            _ => return Dispatch::PassThrough,
        };
        if editing && self.mode == ShortcutMode::SuspendWhileEditing {
            return Dispatch::PassThrough;
        }
        if command.allowed(note_count) {
            tracing::debug!(?command, note_count, "shortcut");
            Dispatch::Consumed(Some(command))
        } else {
            tracing::debug!(?command, note_count, "shortcut guard rejected");
            Dispatch::Consumed(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    #[test]
    fn table_keys_map_to_commands() {
        let dispatcher = Dispatcher::new(ShortcutMode::Global);
        let expected = [
            ('p', Command::SubmitCreate),
            ('/', Command::Focus(FormField::Title)),
            ('d', Command::Focus(FormField::Description)),
            ('t', Command::Focus(FormField::Timestamp)),
            ('1', Command::OpenDelete(0)),
            ('2', Command::OpenDelete(1)),
            ('u', Command::OpenUpdate(0)),
            ('c', Command::ClearDraft),
            ('n', Command::ShiftDate(1)),
            ('b', Command::ShiftDate(-1)),
        ];
        for (ch, command) in expected {
            assert_eq!(
                dispatcher.dispatch(&key(ch), 2, false),
                Dispatch::Consumed(Some(command)),
                "key {ch}"
            );
        }
    }

    #[test]
    fn positional_guards_consume_without_acting() {
        let dispatcher = Dispatcher::new(ShortcutMode::Global);
        assert_eq!(dispatcher.dispatch(&key('1'), 0, false), Dispatch::Consumed(None));
        assert_eq!(dispatcher.dispatch(&key('u'), 0, false), Dispatch::Consumed(None));
        assert_eq!(dispatcher.dispatch(&key('2'), 1, false), Dispatch::Consumed(None));
        assert_eq!(
            dispatcher.dispatch(&key('1'), 1, false),
            Dispatch::Consumed(Some(Command::OpenDelete(0)))
        );
    }

    #[test]
    fn other_keys_pass_through() {
        let dispatcher = Dispatcher::new(ShortcutMode::Global);
        assert_eq!(dispatcher.dispatch(&key('x'), 3, false), Dispatch::PassThrough);
        assert_eq!(dispatcher.dispatch(&key('P'), 3, false), Dispatch::PassThrough);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(dispatcher.dispatch(&enter, 3, false), Dispatch::PassThrough);
        let ctrl_p = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(dispatcher.dispatch(&ctrl_p, 3, false), Dispatch::PassThrough);
    }

    #[test]
    fn global_mode_intercepts_while_typing() {
        let dispatcher = Dispatcher::new(ShortcutMode::Global);
        assert_eq!(
            dispatcher.dispatch(&key('n'), 0, true),
            Dispatch::Consumed(Some(Command::ShiftDate(1)))
        );
    }

    #[test]
    fn suspended_mode_yields_to_the_focused_field() {
        let dispatcher = Dispatcher::new(ShortcutMode::SuspendWhileEditing);
        assert_eq!(dispatcher.dispatch(&key('n'), 0, true), Dispatch::PassThrough);
        assert_eq!(
            dispatcher.dispatch(&key('n'), 0, false),
            Dispatch::Consumed(Some(Command::ShiftDate(1)))
        );
    }
}
