//! Response rendering.
//!
//! # Responsibilities
//! - Render the compliance report as a `.properties` document
//! - Add the `X-Compliance-Violations` count header
//! - Map rejected requests to `400 Bad Request` with `Connection: close`
//!
//! # Design Decisions
//! - Line order is fixed: cookie count, cookies, violation count, violations
//! - Keys and values are escaped so that any cookie text survives a round trip
//! - `parse_properties` is the client-side decoder (used by the CLI and tests)

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::compliance::{Rejection, RequestCompliance, Violation};
use crate::cookie::CookieParseResult;

pub const X_COMPLIANCE_VIOLATIONS: HeaderName = HeaderName::from_static("x-compliance-violations");

const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Body of a successful `/cookie` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub mode: String,
    pub cookies: CookieParseResult,
    /// `None` when violation reporting is switched off.
    pub violations: Option<Vec<Violation>>,
}

impl ComplianceReport {
    pub fn new(mode: &str, compliance: RequestCompliance, record_violations: bool) -> Self {
        Self {
            mode: mode.to_string(),
            cookies: compliance.cookies,
            violations: record_violations.then_some(compliance.violations),
        }
    }

    pub fn to_properties(&self) -> String {
        let mut out = String::from("# compliance report, mode ");
        escape_into(&mut out, &self.mode, false);
        out.push('\n');

        match self.cookies.pairs() {
            None => push_entry(&mut out, "cookies.length", "null"),
            Some(pairs) => {
                push_entry(&mut out, "cookies.length", &pairs.len().to_string());
                for pair in pairs {
                    push_entry(&mut out, &format!("cookie.{}", pair.name), &pair.value);
                }
            }
        }

        if let Some(violations) = &self.violations {
            push_entry(&mut out, "violations.length", &violations.len().to_string());
            for (i, violation) in violations.iter().enumerate() {
                push_entry(&mut out, &format!("violation.{}", i), &violation.to_string());
            }
        }

        out
    }
}

impl IntoResponse for ComplianceReport {
    fn into_response(self) -> Response {
        let body = self.to_properties();
        let mut response = (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE))],
            body,
        )
            .into_response();

        if let Some(violations) = &self.violations {
            response
                .headers_mut()
                .insert(X_COMPLIANCE_VIOLATIONS, HeaderValue::from(violations.len()));
        }
        response
    }
}

/// `400 Bad Request` for a request refused by Host validation.
pub fn rejection_response(rejection: &Rejection) -> Response {
    let mut body = String::from("# request rejected\n");
    push_entry(&mut body, "status", "400");
    push_entry(&mut body, "reason", rejection.reason.as_str());
    push_entry(&mut body, "message", rejection.reason.description());

    (
        StatusCode::BAD_REQUEST,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE)),
            (header::CONNECTION, HeaderValue::from_static("close")),
        ],
        body,
    )
        .into_response()
}

fn push_entry(out: &mut String, key: &str, value: &str) {
    escape_into(out, key, true);
    out.push('=');
    escape_into(out, value, false);
    out.push('\n');
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' | '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_ascii_control() || !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
}

/// Decode a `.properties` document into ordered key/value entries.
///
/// Blank lines and `#`/`!` comments are skipped. Line continuations are not
/// supported; the renderer never produces them.
pub fn parse_properties(body: &str) -> Vec<(String, String)> {
    body.lines()
        .map(|line| line.trim_start_matches([' ', '\t', '\u{000C}']))
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let key = unescape(&mut chars, true);

    while matches!(chars.peek(), Some(' ' | '\t' | '\u{000C}')) {
        chars.next();
    }
    if matches!(chars.peek(), Some('=' | ':')) {
        chars.next();
    }
    while matches!(chars.peek(), Some(' ' | '\t' | '\u{000C}')) {
        chars.next();
    }

    let value = unescape(&mut chars, false);
    (key, value)
}

/// Read escaped text up to the end of the key (an unescaped separator) or line.
fn unescape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, is_key: bool) -> String {
    let mut out = String::new();
    let mut pending_high: Option<u16> = None;

    while let Some(&c) = chars.peek() {
        if is_key && matches!(c, '=' | ':' | ' ' | '\t' | '\u{000C}') {
            break;
        }
        chars.next();
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let Ok(unit) = u16::from_str_radix(&hex, 16) else {
                    out.push_str(&hex);
                    continue;
                };
                match pending_high.take() {
                    Some(high) => out.extend(char::decode_utf16([high, unit]).map(|r| {
                        r.unwrap_or(char::REPLACEMENT_CHARACTER)
                    })),
                    None if (0xD800..0xDC00).contains(&unit) => pending_high = Some(unit),
                    None => out.push(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER)),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    if pending_high.is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
    out
}
