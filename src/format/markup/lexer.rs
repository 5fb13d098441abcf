// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Token scanner over the cumulative markup buffer.
//!
//! The scanner never fails: a construct cut off by the end of the buffer is
//! reported as `Scan::Incomplete` with the offset it starts at, so the caller
//! can stop there and resume from the same offset once more text has arrived.

use memchr::memchr;
use smallvec::SmallVec;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenTag {
    pub name: SmolStr,
    pub attrs: SmallVec<[(SmolStr, String); 2]>,
    pub self_closing: bool,
}

impl OpenTag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Open(OpenTag),
    Close(SmolStr),
    Text(String),
    /// Comments and declarations; scanned past, never surfaced.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scan {
    Token { token: Token, next: usize },
    /// The buffer ends inside an unfinished tag or comment starting at `at`.
    Incomplete { at: usize },
    End,
}

/// Scans the next token at byte offset `pos`.
pub(crate) fn scan(buffer: &str, pos: usize) -> Scan {
    let bytes = buffer.as_bytes();
    if pos >= bytes.len() {
        return Scan::End;
    }

    match memchr(b'<', &bytes[pos..]) {
        Some(0) => scan_tag(buffer, pos),
        Some(offset) => Scan::Token {
            token: Token::Text(decode_entities(&buffer[pos..pos + offset])),
            next: pos + offset,
        },
        None => Scan::Token {
            token: Token::Text(decode_entities(&buffer[pos..])),
            next: bytes.len(),
        },
    }
}

fn scan_tag(buffer: &str, start: usize) -> Scan {
    let rest = &buffer[start..];

    if rest.starts_with("<!--") {
        return match rest[4..].find("-->") {
            Some(end) => Scan::Token {
                token: Token::Skip,
                next: start + 4 + end + 3,
            },
            None => Scan::Incomplete { at: start },
        };
    }

    let Some(first) = rest[1..].chars().next() else {
        // Lone '<' at the end of the buffer.
        return Scan::Incomplete { at: start };
    };
    if !(first.is_ascii_alphanumeric() || matches!(first, '/' | '!' | '?')) {
        // A '<' that cannot start a tag is literal text.
        return Scan::Token {
            token: Token::Text("<".to_owned()),
            next: start + 1,
        };
    }

    // Find the closing '>' outside quoted attribute values. Quotes only count
    // when they open an attribute value (right after '='), so an apostrophe in
    // unquoted content cannot swallow the rest of the buffer.
    let mut quote: Option<char> = None;
    let mut after_eq = false;
    let mut gt: Option<usize> = None;
    for (idx, ch) in rest.char_indices().skip(1) {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' if after_eq => {
                    quote = Some(ch);
                    after_eq = false;
                }
                '=' => after_eq = true,
                '>' => {
                    gt = Some(idx);
                    break;
                }
                '<' => {
                    // Another opener before this tag closed: the first '<' was
                    // literal text after all.
                    return Scan::Token {
                        token: Token::Text("<".to_owned()),
                        next: start + 1,
                    };
                }
                ch if ch.is_whitespace() => {}
                _ => after_eq = false,
            },
        }
    }
    let Some(gt) = gt else {
        return Scan::Incomplete { at: start };
    };

    let next = start + gt + 1;
    let content = &rest[1..gt];

    if content.starts_with('!') || content.starts_with('?') {
        return Scan::Token {
            token: Token::Skip,
            next,
        };
    }

    if let Some(name) = content.strip_prefix('/') {
        let name = name.trim();
        if name.is_empty() {
            return Scan::Token {
                token: Token::Skip,
                next,
            };
        }
        return Scan::Token {
            token: Token::Close(SmolStr::new(name)),
            next,
        };
    }

    let (content, self_closing) = match content.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (content, false),
    };

    let content = content.trim();
    let name_end = content
        .find(char::is_whitespace)
        .unwrap_or(content.len());
    let name = &content[..name_end];
    if name.is_empty() {
        return Scan::Token {
            token: Token::Skip,
            next,
        };
    }

    let attrs = parse_attrs(content[name_end..].trim_start());
    Scan::Token {
        token: Token::Open(OpenTag {
            name: SmolStr::new(name),
            attrs,
            self_closing,
        }),
        next,
    }
}

fn parse_attrs(mut rest: &str) -> SmallVec<[(SmolStr, String); 2]> {
    let mut attrs = SmallVec::new();

    while !rest.is_empty() {
        let name_end = rest
            .find(|ch: char| ch == '=' || ch.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            rest = after_eq.trim_start();
            if let Some(open) = rest.chars().next().filter(|ch| matches!(ch, '"' | '\'')) {
                match rest[open.len_utf8()..].find(open) {
                    Some(end) => {
                        value = decode_entities(&rest[1..1 + end]);
                        rest = &rest[1 + end + 1..];
                    }
                    None => {
                        // Unterminated quote in an otherwise complete tag.
                        value = decode_entities(&rest[1..]);
                        rest = "";
                    }
                }
            } else {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                value = decode_entities(&rest[..end]);
                rest = &rest[end..];
            }
        } else if name.is_empty() {
            // Junk that is neither a name nor '=': step over one char.
            let step = rest.chars().next().map(char::len_utf8).unwrap_or(0);
            if step == 0 {
                break;
            }
            rest = &rest[step..];
        }

        if !name.is_empty() {
            attrs.push((SmolStr::new(name), value));
        }
        rest = rest.trim_start();
    }

    attrs
}

/// Decodes the five XML escapes; unknown or incomplete entities pass through
/// verbatim.
pub(crate) fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }

    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
