//! `Host` header validation.

use serde::Serialize;

use crate::compliance::{ComplianceMode, Violation, ViolationKind, ViolationRecorder};

/// Outcome of validating the `Host` headers of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostValidationResult {
    Accepted { host: String, port: Option<u16> },
    Rejected { reason: ViolationKind },
}

impl HostValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, HostValidationResult::Accepted { .. })
    }
}

/// Validate the ordered `Host` values of one request under `mode`.
///
/// Values are compared as raw bytes, so two values that differ only in
/// invalid UTF-8 are still differing duplicates.
pub fn validate<S: AsRef<[u8]>>(
    values: &[S],
    mode: &ComplianceMode,
) -> (HostValidationResult, Vec<Violation>) {
    let mut recorder = ViolationRecorder::new();
    let result = validate_with(values, mode, &mut recorder);
    (result, recorder.into_inner())
}

/// Like [`validate`], appending tolerated violations to `recorder`.
pub fn validate_with<S: AsRef<[u8]>>(
    values: &[S],
    mode: &ComplianceMode,
    recorder: &mut ViolationRecorder,
) -> HostValidationResult {
    let raw = match values {
        [] => {
            return reject(ViolationKind::UnsafeHostHeader, "missing Host header");
        }
        [only] => only.as_ref(),
        [first, rest @ ..] => {
            let first = first.as_ref();
            if rest.iter().any(|v| v.as_ref() != first) {
                return reject(
                    ViolationKind::DuplicateHostHeaders,
                    "differing Host headers",
                );
            }
            let text = String::from_utf8_lossy(first);
            if !mode.tolerates(ViolationKind::DuplicateHostHeaders) {
                return reject(ViolationKind::DuplicateHostHeaders, &text);
            }
            recorder.record(Violation::new(
                ViolationKind::DuplicateHostHeaders,
                format!("{} identical Host headers: {}", values.len(), text),
            ));
            first
        }
    };

    // Invalid UTF-8 decodes to U+FFFD, which no authority accepts.
    let decoded = String::from_utf8_lossy(raw);
    let value = decoded.trim_matches([' ', '\t']);
    match parse_authority(value) {
        Ok((host, port)) => HostValidationResult::Accepted {
            host: host.to_string(),
            port,
        },
        Err(unsafe_authority) => {
            if !mode.tolerates(ViolationKind::UnsafeHostHeader) {
                return reject(ViolationKind::UnsafeHostHeader, value);
            }
            recorder.record(Violation::new(
                ViolationKind::UnsafeHostHeader,
                format!("{}: {}", unsafe_authority.reason, value),
            ));
            HostValidationResult::Accepted {
                host: unsafe_authority.host.to_string(),
                port: None,
            }
        }
    }
}

fn reject(reason: ViolationKind, detail: &str) -> HostValidationResult {
    tracing::debug!(kind = %reason, detail = %detail, "Rejecting Host header");
    HostValidationResult::Rejected { reason }
}

/// Why an authority was refused, and the best-effort host to keep when the
/// mode tolerates it.
#[derive(Debug, PartialEq, Eq)]
struct UnsafeAuthority<'a> {
    host: &'a str,
    reason: &'static str,
}

/// Split `host[:port]`, checking both halves.
fn parse_authority(value: &str) -> Result<(&str, Option<u16>), UnsafeAuthority<'_>> {
    let (host, port) = split_authority(value)?;

    let port = match port {
        None | Some("") => None,
        Some(port) => Some(parse_port(port).ok_or(UnsafeAuthority {
            host,
            reason: "invalid port",
        })?),
    };

    if host.is_empty() && port.is_some() {
        return Err(UnsafeAuthority {
            host,
            reason: "port without host",
        });
    }
    if !host.starts_with('[') && !host.chars().all(is_reg_name_char) {
        return Err(UnsafeAuthority {
            host,
            reason: "invalid character in host",
        });
    }

    Ok((host, port))
}

fn split_authority(value: &str) -> Result<(&str, Option<&str>), UnsafeAuthority<'_>> {
    if value.starts_with('[') {
        let Some(close) = value.find(']') else {
            return Err(UnsafeAuthority {
                host: value,
                reason: "unterminated IP literal",
            });
        };
        let (host, rest) = value.split_at(close + 1);
        if !host[1..close].chars().all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '.')) {
            return Err(UnsafeAuthority {
                host,
                reason: "invalid IP literal",
            });
        }
        return match rest.strip_prefix(':') {
            Some(port) => Ok((host, Some(port))),
            None if rest.is_empty() => Ok((host, None)),
            None => Err(UnsafeAuthority {
                host,
                reason: "text after IP literal",
            }),
        };
    }

    match value.split_once(':') {
        Some((host, port)) if port.contains(':') => Err(UnsafeAuthority {
            host,
            reason: "ambiguous authority",
        }),
        Some((host, port)) => Ok((host, Some(port))),
        None => Ok((value, None)),
    }
}

fn parse_port(port: &str) -> Option<u16> {
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    port.parse().ok()
}

/// RFC 3986 reg-name characters: unreserved, sub-delims and `%`.
fn is_reg_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=' | '%'
        )
}
