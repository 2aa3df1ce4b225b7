//! Inbound message classification
//!
//! Every inbound text is mapped to a closed [`Inbound`] value at the edge, so
//! the conversation engine never compares against free-form strings.

/// Slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the welcome text and menu
    Start,
    /// Show help
    Help,
    /// Anything else starting with `/`
    Unknown(String),
}

impl Command {
    /// Parse a command from user input.
    ///
    /// Returns `None` if the input is not a command. A trailing `@botname`
    /// and any arguments are ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();

        Some(match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            _ => Command::Unknown(name),
        })
    }
}

/// Menu button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    PhoneLookup,
    IpLookup,
    Status,
    Help,
}

impl MenuAction {
    /// Buttons in keyboard order
    pub const ALL: [MenuAction; 4] = [
        MenuAction::PhoneLookup,
        MenuAction::IpLookup,
        MenuAction::Status,
        MenuAction::Help,
    ];

    /// Button caption, as sent back by the client when tapped
    pub fn caption(self) -> &'static str {
        match self {
            MenuAction::PhoneLookup => "📱 Phone Lookup",
            MenuAction::IpLookup => "🌐 IP Lookup",
            MenuAction::Status => "📊 Status",
            MenuAction::Help => "ℹ️ Help",
        }
    }

    /// Exact caption match
    pub fn from_caption(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.caption() == text)
    }

    /// Keyboard layout, two buttons per row
    pub fn rows() -> [[MenuAction; 2]; 2] {
        [
            [MenuAction::PhoneLookup, MenuAction::IpLookup],
            [MenuAction::Status, MenuAction::Help],
        ]
    }
}

/// Classified inbound text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Menu(MenuAction),
    Text(String),
}

impl Inbound {
    /// Classify raw inbound text
    pub fn parse(text: &str) -> Self {
        if let Some(action) = MenuAction::from_caption(text) {
            return Inbound::Menu(action);
        }
        if let Some(command) = Command::parse(text) {
            return Inbound::Command(command);
        }
        Inbound::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/START"), Some(Command::Start));
        assert_eq!(Command::parse("/start@lookup_bot"), Some(Command::Start));
        assert_eq!(Command::parse("/help me"), Some(Command::Help));
        assert_eq!(
            Command::parse("/weather"),
            Some(Command::Unknown("weather".to_string()))
        );
        assert_eq!(Command::parse("start"), None);
    }

    #[test]
    fn test_captions_round_trip() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::from_caption(action.caption()), Some(action));
        }
    }

    #[test]
    fn test_caption_match_is_exact() {
        assert_eq!(MenuAction::from_caption("Phone Lookup"), None);
        assert_eq!(MenuAction::from_caption("📱 Phone Lookup "), None);
        assert_eq!(MenuAction::from_caption("📱 phone lookup"), None);
    }

    #[test]
    fn test_inbound_parse() {
        assert_eq!(
            Inbound::parse("🌐 IP Lookup"),
            Inbound::Menu(MenuAction::IpLookup)
        );
        assert_eq!(Inbound::parse("/help"), Inbound::Command(Command::Help));
        assert_eq!(
            Inbound::parse("9876543210"),
            Inbound::Text("9876543210".to_string())
        );
    }

    #[test]
    fn test_rows_cover_every_action() {
        let flat: Vec<MenuAction> = MenuAction::rows().into_iter().flatten().collect();
        assert_eq!(flat, MenuAction::ALL.to_vec());
    }
}
