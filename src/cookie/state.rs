//! Cookie header state machine: states, character classes and the
//! transition table.
//!
//! The table is pure. It says where each `(state, class)` pair leads and
//! which grammar violation, if any, the character represents. Whether a
//! violation is tolerated is decided by the scanner in `parser.rs`.

use crate::compliance::ViolationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    ExpectName,
    InName,
    ExpectEquals,
    ExpectValue,
    InUnquotedValue,
    InQuotedValue,
    InQuotedEscape,
    AfterQuotedValue,
    /// Skipping the rest of a dropped pair.
    ExpectSeparator,
}

/// Input classes the table distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// SP or HTAB.
    Whitespace,
    Semicolon,
    Equals,
    DQuote,
    Backslash,
    Comma,
    /// `(` or `)`.
    Paren,
    /// Any other RFC 2616 separator, a control character, or non-ASCII.
    Delimiter,
    /// A character allowed in a token.
    Token,
    /// End of the header value.
    End,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        match c {
            ' ' | '\t' => CharClass::Whitespace,
            ';' => CharClass::Semicolon,
            '=' => CharClass::Equals,
            '"' => CharClass::DQuote,
            '\\' => CharClass::Backslash,
            ',' => CharClass::Comma,
            '(' | ')' => CharClass::Paren,
            '<' | '>' | '@' | ':' | '/' | '[' | ']' | '?' | '{' | '}' => CharClass::Delimiter,
            c if c.is_ascii_graphic() => CharClass::Token,
            _ => CharClass::Delimiter,
        }
    }

    /// Whether this class ends the current pair.
    pub fn ends_pair(self) -> bool {
        matches!(self, CharClass::Semicolon | CharClass::End)
    }
}

/// How the scanner continues when a violation is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Keep the character as part of the name.
    ExtendName,
    /// Keep the character as part of the value.
    PushValue,
    /// Finish the pair with the raw text starting at the opening quote.
    EmitRaw,
    /// Restart the value as raw text from the opening quote and keep
    /// reading it unquoted.
    ReopenRaw,
    /// Finish the pair with an empty value.
    EmitEmptyValue,
    /// The pair cannot be kept in any mode.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    Name,
    OpenQuote,
    PushValue,
    /// Keep a backslash and the escaped character literally.
    PushEscaped,
    Emit,
    Violation { kind: ViolationKind, recovery: Recovery },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State to continue in, assuming any violation is tolerated.
    pub next: State,
    pub action: Action,
}

/// Where scanning resumes after dropping a pair on `class`.
pub fn resume_after_drop(class: CharClass) -> State {
    if class.ends_pair() {
        State::ExpectName
    } else {
        State::ExpectSeparator
    }
}

fn invalid(recovery: Recovery) -> Action {
    Action::Violation {
        kind: ViolationKind::InvalidCookies,
        recovery,
    }
}

fn violation(kind: ViolationKind, recovery: Recovery) -> Action {
    Action::Violation { kind, recovery }
}

pub fn transition(state: State, class: CharClass) -> Transition {
    use Action::{Emit, Name, OpenQuote, PushEscaped, PushValue, Skip};
    use CharClass as C;
    use State as S;

    let (next, action) = match (state, class) {
        (S::ExpectName, C::Whitespace | C::Semicolon | C::End) => (S::ExpectName, Skip),
        (S::ExpectName, C::Equals) => (S::ExpectSeparator, invalid(Recovery::Discard)),
        (S::ExpectName, C::Token) => (S::InName, Name),
        (S::ExpectName, _) => (S::InName, invalid(Recovery::ExtendName)),

        (S::InName, C::Token) => (S::InName, Name),
        (S::InName, C::Equals) => (S::ExpectValue, Skip),
        (S::InName, C::Whitespace) => (S::ExpectEquals, Skip),
        (S::InName, C::Semicolon | C::End) => (S::ExpectName, invalid(Recovery::EmitEmptyValue)),
        (S::InName, _) => (S::InName, invalid(Recovery::ExtendName)),

        (S::ExpectEquals, C::Whitespace) => (S::ExpectEquals, Skip),
        (S::ExpectEquals, C::Equals) => (S::ExpectValue, Skip),
        (S::ExpectEquals, C::Semicolon | C::End) => {
            (S::ExpectName, invalid(Recovery::EmitEmptyValue))
        }
        (S::ExpectEquals, _) => (S::InName, invalid(Recovery::ExtendName)),

        (S::ExpectValue, C::Whitespace) => (S::ExpectValue, Skip),
        (S::ExpectValue, C::Semicolon | C::End) => (S::ExpectName, Emit),
        (S::ExpectValue, C::DQuote) => (S::InQuotedValue, OpenQuote),
        (S::ExpectValue, _) => (S::InUnquotedValue, PushValue),

        (S::InUnquotedValue, C::Semicolon | C::End) => (S::ExpectName, Emit),
        (S::InUnquotedValue, _) => (S::InUnquotedValue, PushValue),

        (S::InQuotedValue, C::DQuote) => (S::AfterQuotedValue, Skip),
        (S::InQuotedValue, C::Backslash) => (S::InQuotedEscape, Skip),
        (S::InQuotedValue, C::Comma) => (
            S::InQuotedValue,
            violation(ViolationKind::SpecialCharsInQuotes, Recovery::PushValue),
        ),
        (S::InQuotedValue, C::Semicolon | C::End) => (
            S::ExpectName,
            violation(ViolationKind::BadQuotes, Recovery::EmitRaw),
        ),
        (S::InQuotedValue, _) => (S::InQuotedValue, PushValue),

        (S::InQuotedEscape, C::Paren) => (
            S::InQuotedValue,
            violation(ViolationKind::EscapeInQuotes, Recovery::PushValue),
        ),
        (S::InQuotedEscape, C::Semicolon | C::End) => (
            S::ExpectName,
            violation(ViolationKind::BadQuotes, Recovery::EmitRaw),
        ),
        (S::InQuotedEscape, _) => (S::InQuotedValue, PushEscaped),

        (S::AfterQuotedValue, C::Whitespace) => (S::AfterQuotedValue, Skip),
        (S::AfterQuotedValue, C::Semicolon | C::End) => (S::ExpectName, Emit),
        (S::AfterQuotedValue, _) => (
            S::InUnquotedValue,
            violation(ViolationKind::BadQuotes, Recovery::ReopenRaw),
        ),

        (S::ExpectSeparator, C::Semicolon | C::End) => (S::ExpectName, Skip),
        (S::ExpectSeparator, _) => (S::ExpectSeparator, Skip),
    };

    Transition { next, action }
}
