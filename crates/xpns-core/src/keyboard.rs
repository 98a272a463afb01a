//! Global keyboard shortcuts and the description autocomplete list.

/// Fields where a bare Enter must not submit the form; Ctrl+Enter does.
pub const SUBMIT_ON_CTRL_ENTER_FIELDS: [&str; 12] = [
    "description",
    "amount",
    "currency-input",
    "date-input",
    "exchange-rate",
    "recurring-checkbox",
    "recurring-frequency",
    "recurring-monthly",
    "recurring-yearly",
    "recurring-from",
    "recurring-to",
    "type-select",
];

pub const DESCRIPTION_FIELD: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Insert,
    ArrowUp,
    ArrowDown,
    Other(String),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Insert" => Self::Insert,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    /// Id of the focused element, if it has one.
    pub target_id: Option<String>,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            target_id: None,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn on(mut self, target_id: &str) -> Self {
        self.target_id = Some(target_id.to_string());
        self
    }

    fn target_is(&self, id: &str) -> bool {
        self.target_id.as_deref() == Some(id)
    }
}

/// What the surface should do with the native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Swallow it (`preventDefault`).
    Handled,
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    SubmitForm,
    Suppress,
    CancelEdit,
    StartNew,
    CycleProposal(Direction),
    Ignore,
}

pub fn classify(input: &KeyInput) -> KeyCommand {
    let on_form_field = input
        .target_id
        .as_deref()
        .is_some_and(|id| SUBMIT_ON_CTRL_ENTER_FIELDS.contains(&id));

    match &input.key {
        Key::Enter if on_form_field => {
            if input.ctrl {
                KeyCommand::SubmitForm
            } else {
                KeyCommand::Suppress
            }
        }
        Key::Escape => KeyCommand::CancelEdit,
        Key::Insert if input.ctrl => KeyCommand::StartNew,
        Key::ArrowDown if input.target_is(DESCRIPTION_FIELD) => {
            KeyCommand::CycleProposal(Direction::Forward)
        }
        Key::ArrowUp if input.target_is(DESCRIPTION_FIELD) => {
            KeyCommand::CycleProposal(Direction::Backward)
        }
        _ => KeyCommand::Ignore,
    }
}

/// Autocomplete proposals under the description field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalList {
    options: Vec<String>,
    selected: Option<usize>,
}

impl ProposalList {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Moves the selection one step, wrapping at both ends. Without a
    /// selection, forward picks the first option and backward the last.
    /// Returns the newly selected option, `None` if there are no options.
    pub fn cycle(&mut self, direction: Direction) -> Option<&str> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }

        let next = match (self.selected, direction) {
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => len - 1,
            (Some(current), Direction::Forward) => (current + 1) % len,
            (Some(current), Direction::Backward) => (current + len - 1) % len,
        };
        self.selected = Some(next);
        self.options.get(next).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_on_form_field_requires_ctrl() {
        let bare = KeyInput::new(Key::Enter).on("amount");
        assert_eq!(classify(&bare), KeyCommand::Suppress);
        assert_eq!(classify(&bare.with_ctrl()), KeyCommand::SubmitForm);
    }

    #[test]
    fn enter_elsewhere_is_ignored() {
        let input = KeyInput::new(Key::Enter).on("search");
        assert_eq!(classify(&input), KeyCommand::Ignore);
        assert_eq!(classify(&KeyInput::new(Key::Enter)), KeyCommand::Ignore);
    }

    #[test]
    fn escape_and_ctrl_insert() {
        assert_eq!(classify(&KeyInput::new(Key::Escape)), KeyCommand::CancelEdit);
        assert_eq!(classify(&KeyInput::new(Key::Insert)), KeyCommand::Ignore);
        assert_eq!(
            classify(&KeyInput::new(Key::Insert).with_ctrl()),
            KeyCommand::StartNew
        );
    }

    #[test]
    fn arrows_cycle_only_on_description() {
        assert_eq!(
            classify(&KeyInput::new(Key::ArrowDown).on("description")),
            KeyCommand::CycleProposal(Direction::Forward)
        );
        assert_eq!(
            classify(&KeyInput::new(Key::ArrowUp).on("description")),
            KeyCommand::CycleProposal(Direction::Backward)
        );
        assert_eq!(
            classify(&KeyInput::new(Key::ArrowUp).on("amount")),
            KeyCommand::Ignore
        );
    }

    #[test]
    fn empty_proposals_do_not_cycle() {
        let mut list = ProposalList::default();
        assert_eq!(list.cycle(Direction::Forward), None);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn proposals_wrap_both_ways() {
        let mut list = ProposalList::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(list.cycle(Direction::Forward), Some("a"));
        assert_eq!(list.cycle(Direction::Forward), Some("b"));
        assert_eq!(list.cycle(Direction::Forward), Some("c"));
        assert_eq!(list.cycle(Direction::Forward), Some("a"));
        assert_eq!(list.cycle(Direction::Backward), Some("c"));

        let mut fresh = ProposalList::new(vec!["a".into(), "b".into()]);
        assert_eq!(fresh.cycle(Direction::Backward), Some("b"));
    }
}
