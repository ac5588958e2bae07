//! Cookie header scanner.

use serde::Serialize;

use crate::compliance::{ComplianceMode, Violation, ViolationKind, ViolationRecorder};
use crate::cookie::state::{resume_after_drop, transition, Action, CharClass, Recovery, State};

/// A decoded cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookiePair {
    pub name: String,
    pub value: String,
}

impl CookiePair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result of parsing the `Cookie` header of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CookieParseResult {
    /// The request carried no `Cookie` header.
    NoHeader,
    /// Pairs that survived parsing, in header order.
    Parsed { pairs: Vec<CookiePair> },
}

impl CookieParseResult {
    pub fn pairs(&self) -> Option<&[CookiePair]> {
        match self {
            CookieParseResult::NoHeader => None,
            CookieParseResult::Parsed { pairs } => Some(pairs),
        }
    }

    /// Number of pairs, or `None` without a header.
    pub fn len(&self) -> Option<usize> {
        self.pairs().map(<[CookiePair]>::len)
    }

    /// Value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs()?
            .iter()
            .find(|pair| pair.name == name)
            .map(|pair| pair.value.as_str())
    }
}

/// Parse a raw `Cookie` header value under `mode`.
///
/// Returns the parse result together with the violations the mode
/// tolerated, in detection order.
pub fn parse(raw: Option<&str>, mode: &ComplianceMode) -> (CookieParseResult, Vec<Violation>) {
    let mut recorder = ViolationRecorder::new();
    let result = parse_with(raw, mode, &mut recorder);
    (result, recorder.into_inner())
}

/// Like [`parse`], appending tolerated violations to `recorder`.
pub fn parse_with(
    raw: Option<&str>,
    mode: &ComplianceMode,
    recorder: &mut ViolationRecorder,
) -> CookieParseResult {
    match raw {
        None => CookieParseResult::NoHeader,
        Some(header) => CookieParseResult::Parsed {
            pairs: Scanner::new(header, mode, recorder).run(),
        },
    }
}

struct Scanner<'a> {
    input: &'a str,
    mode: &'a ComplianceMode,
    recorder: &'a mut ViolationRecorder,
    state: State,
    /// Offset where the current `;`-separated segment starts.
    segment_start: usize,
    name: Option<(usize, usize)>,
    value: String,
    quote_at: Option<usize>,
    pairs: Vec<CookiePair>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, mode: &'a ComplianceMode, recorder: &'a mut ViolationRecorder) -> Self {
        Self {
            input,
            mode,
            recorder,
            state: State::ExpectName,
            segment_start: 0,
            name: None,
            value: String::new(),
            quote_at: None,
            pairs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<CookiePair> {
        let input = self.input;
        for (at, c) in input.char_indices() {
            self.step(at, Some(c));
        }
        self.step(input.len(), None);
        self.pairs
    }

    fn step(&mut self, at: usize, c: Option<char>) {
        let class = c.map_or(CharClass::End, CharClass::of);
        let from = self.state;
        let t = transition(from, class);
        self.state = t.next;

        match t.action {
            Action::Skip => {}
            Action::Name => self.extend_name(at, c),
            Action::OpenQuote => self.quote_at = Some(at),
            Action::PushValue => self.value.extend(c),
            Action::PushEscaped => {
                self.value.push('\\');
                self.value.extend(c);
            }
            Action::Emit => self.emit(from == State::InUnquotedValue),
            Action::Violation { kind, recovery } => {
                self.on_violation(kind, recovery, at, c, class)
            }
        }

        if class == CharClass::Semicolon && self.state == State::ExpectName {
            self.segment_start = at + 1;
        }
    }

    fn on_violation(
        &mut self,
        kind: ViolationKind,
        recovery: Recovery,
        at: usize,
        c: Option<char>,
        class: CharClass,
    ) {
        let fragment = self.fragment(at, c);

        if !self.mode.tolerates(kind) {
            tracing::debug!(
                kind = %kind,
                mode = %self.mode.name(),
                pair = %fragment,
                "Dropping cookie pair"
            );
            self.drop_pair(class);
            return;
        }

        self.recorder
            .record(Violation::new(kind, describe(kind, recovery, c, fragment)));

        match recovery {
            Recovery::ExtendName => self.extend_name(at, c),
            Recovery::PushValue => self.value.extend(c),
            Recovery::EmitRaw => {
                let start = self.quote_at.unwrap_or(at);
                self.value = self.input[start..at].to_string();
                self.emit(false);
            }
            Recovery::ReopenRaw => {
                let start = self.quote_at.unwrap_or(at);
                let end = at + c.map_or(0, char::len_utf8);
                self.value = self.input[start..end].to_string();
            }
            Recovery::EmitEmptyValue => {
                self.value.clear();
                self.emit(false);
            }
            Recovery::Discard => self.drop_pair(class),
        }
    }

    fn extend_name(&mut self, at: usize, c: Option<char>) {
        let end = at + c.map_or(0, char::len_utf8);
        self.name = Some(match self.name {
            Some((start, _)) => (start, end),
            None => (at, end),
        });
    }

    fn emit(&mut self, trim: bool) {
        let value = std::mem::take(&mut self.value);
        if let Some((start, end)) = self.name {
            let value = if trim {
                trim_trailing(&value).to_string()
            } else {
                value
            };
            self.pairs
                .push(CookiePair::new(&self.input[start..end], value));
        }
        self.reset();
    }

    fn drop_pair(&mut self, class: CharClass) {
        self.reset();
        self.state = resume_after_drop(class);
    }

    fn reset(&mut self) {
        self.name = None;
        self.value.clear();
        self.quote_at = None;
    }

    /// Header text of the current pair up to and including `c`.
    fn fragment(&self, at: usize, c: Option<char>) -> &'a str {
        let input = self.input;
        let end = match c {
            Some(';') | None => at,
            Some(c) => at + c.len_utf8(),
        };
        input[self.segment_start..end].trim_start()
    }
}

fn trim_trailing(s: &str) -> &str {
    s.trim_end_matches([' ', '\t'])
}

fn describe(kind: ViolationKind, recovery: Recovery, c: Option<char>, fragment: &str) -> String {
    match (kind, recovery, c) {
        (ViolationKind::InvalidCookies, Recovery::Discard, _) => {
            format!("cookie without a name: {}", fragment)
        }
        (ViolationKind::InvalidCookies, Recovery::EmitEmptyValue, _) => {
            format!("cookie without a value: {}", fragment)
        }
        (ViolationKind::BadQuotes, Recovery::ReopenRaw, _) => {
            format!("text after closing quote: {}", fragment)
        }
        (ViolationKind::BadQuotes, _, _) => format!("unterminated quoted value: {}", fragment),
        (_, _, Some(c)) => format!("{} {:?}: {}", kind.description(), c, fragment),
        (_, _, None) => format!("{}: {}", kind.description(), fragment),
    }
}
