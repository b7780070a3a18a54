//! Argument keywords (typed placeholders in usage slots)
//!
//! A keyword is any token wrapped in [`SENTINEL`] on both ends, e.g. `%number%`.
//! Three keywords are known and validated by the manager:
//!
//! | Keyword     | Accepts                                   |
//! |-------------|-------------------------------------------|
//! | `%number%`  | a token that parses as a 32-bit integer   |
//! | `%decimal%` | a token that parses as a decimal number   |
//! | `%player%`  | the name of a player currently online     |
//!
//! Any other keyword (`%page%`, `%message%`, ...) is a wildcard: the slot
//! accepts every token and the command decides for itself. Unknown keywords
//! are still worth declaring because help output renders them as `<page>`.

use crate::roster::Roster;

/// Marker that opens and closes a keyword token
pub const SENTINEL: char = '%';

/// A keyword known to the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Number,
    Decimal,
    Player,
}

impl Keyword {
    /// Every known keyword, in declaration order
    pub const ALL: [Keyword; 3] = [Keyword::Number, Keyword::Decimal, Keyword::Player];

    /// The token form used in usage slots
    pub fn token(self) -> &'static str {
        match self {
            Keyword::Number => "%number%",
            Keyword::Decimal => "%decimal%",
            Keyword::Player => "%player%",
        }
    }

    /// Look up a known keyword by its token form
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.token() == token)
    }

    /// Does `argument` satisfy this keyword?
    pub fn accepts(self, argument: &str, roster: &dyn Roster) -> bool {
        match self {
            Keyword::Number => argument.parse::<i32>().is_ok(),
            Keyword::Decimal => argument.parse::<f64>().is_ok(),
            Keyword::Player => roster.find(argument).is_some(),
        }
    }
}

/// Shape-only check: starts and ends with the sentinel
pub fn is_keyword(token: &str) -> bool {
    token.len() >= 2 && token.starts_with(SENTINEL) && token.ends_with(SENTINEL)
}

/// Keyword-shaped but not one of [`Keyword::ALL`]
pub fn is_wildcard(token: &str) -> bool {
    is_keyword(token) && Keyword::from_token(token).is_none()
}

/// Keyword without its sentinels, for display (`%page%` -> `page`)
pub fn display_name(token: &str) -> &str {
    token
        .strip_prefix(SENTINEL)
        .and_then(|t| t.strip_suffix(SENTINEL))
        .unwrap_or(token)
}

/// Decide whether a slot made of `options` accepts `argument`
pub fn slot_accepts<S: AsRef<str>>(options: &[S], argument: &str, roster: &dyn Roster) -> bool {
    let mut literal = false;
    let mut keywords = Vec::new();

    for option in options.iter().map(AsRef::as_ref) {
        if is_wildcard(option) {
            return true;
        }
        match Keyword::from_token(option) {
            Some(keyword) => keywords.push(keyword),
            None => literal |= option == argument,
        }
    }

    (literal && !is_keyword(argument)) || keywords.iter().any(|k| k.accepts(argument, roster))
}
