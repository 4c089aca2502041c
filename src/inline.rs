//! Single-pass inline span tokenizer.
//!
//! At each byte offset the matchers are tried in priority order (code, link,
//! strikethrough, bold, italic); the first offset where any of them matches
//! wins, so the result is always the leftmost match. Matched content is taken
//! verbatim: styles do not nest.

use crate::block::Span;

struct Match {
    end: usize,
    span: Span,
}

type Matcher = fn(&mut Scanner, usize) -> Option<Match>;

const MATCHERS: [Matcher; 5] = [code, link, strikethrough, bold, italic];

/// Closing delimiters the matchers search for.
#[derive(Clone, Copy)]
enum Closer {
    Backtick,
    Bracket,
    Paren,
    Tildes,
    Stars,
    LoneStar,
}

/// A fragment plus the last search result for each closer.
///
/// Scanning moves forward, so a remembered `(searched_from, found)` answers
/// every later query that starts between `searched_from` and `found`. Each
/// closer is therefore searched for at most once per occurrence, which keeps
/// runs of unclosed openers linear.
struct Scanner<'a> {
    text: &'a str,
    last: [Option<(usize, Option<usize>)>; 6],
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, last: [None; 6] }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    /// First position `>= from` where `closer` occurs.
    fn next(&mut self, closer: Closer, from: usize) -> Option<usize> {
        if let Some((searched, found)) = self.last[closer as usize] {
            if searched <= from && found.is_none_or(|at| at >= from) {
                return found;
            }
        }
        let bytes = self.bytes();
        let found = match closer {
            Closer::Backtick => find(bytes, from, b"`"),
            Closer::Bracket => find(bytes, from, b"]"),
            Closer::Paren => find(bytes, from, b")"),
            Closer::Tildes => find(bytes, from, b"~~"),
            Closer::Stars => find(bytes, from, b"**"),
            Closer::LoneStar => (from..bytes.len()).find(|&at| lone_star(bytes, at)),
        };
        self.last[closer as usize] = Some((from, found));
        found
    }
}

/// Split `fragment` into typed spans with markdown delimiters removed.
pub fn tokenize(fragment: &str) -> Vec<Span> {
    let mut scanner = Scanner::new(fragment);
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < fragment.len() {
        match MATCHERS.iter().find_map(|matcher| matcher(&mut scanner, pos)) {
            Some(found) => {
                if plain_start < pos {
                    spans.push(Span::text(&fragment[plain_start..pos]));
                }
                spans.push(found.span);
                pos = found.end;
                plain_start = pos;
            }
            None => pos += 1,
        }
    }

    if plain_start < fragment.len() {
        spans.push(Span::text(&fragment[plain_start..]));
    }
    spans
}

fn find(bytes: &[u8], from: usize, pattern: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|p| p + from)
}

/// A `*` that touches no other `*`.
fn lone_star(bytes: &[u8], at: usize) -> bool {
    bytes[at] == b'*' && (at == 0 || bytes[at - 1] != b'*') && bytes.get(at + 1) != Some(&b'*')
}

/// `` `code` ``
fn code(scanner: &mut Scanner, i: usize) -> Option<Match> {
    if scanner.bytes()[i] != b'`' {
        return None;
    }
    let close = scanner.next(Closer::Backtick, i + 1)?;
    if close == i + 1 {
        return None;
    }
    Some(Match {
        end: close + 1,
        span: Span::Code {
            text: scanner.text[i + 1..close].to_string(),
        },
    })
}

/// `[text](href)`
fn link(scanner: &mut Scanner, i: usize) -> Option<Match> {
    let bytes = scanner.bytes();
    if bytes[i] != b'[' {
        return None;
    }
    let label_end = scanner.next(Closer::Bracket, i + 1)?;
    if label_end == i + 1 || bytes.get(label_end + 1) != Some(&b'(') {
        return None;
    }
    let href_end = scanner.next(Closer::Paren, label_end + 2)?;
    if href_end == label_end + 2 {
        return None;
    }
    let text = scanner.text;
    Some(Match {
        end: href_end + 1,
        span: Span::Link {
            text: text[i + 1..label_end].to_string(),
            href: text[label_end + 2..href_end].to_string(),
        },
    })
}

/// Content between a pair of two-byte delimiters, at least one byte long.
fn delimited(scanner: &mut Scanner, i: usize, closer: Closer) -> Option<(String, usize)> {
    let delimiter: &[u8] = match closer {
        Closer::Tildes => b"~~",
        _ => b"**",
    };
    if !scanner.bytes()[i..].starts_with(delimiter) {
        return None;
    }
    let close = scanner.next(closer, i + 3)?;
    Some((scanner.text[i + 2..close].to_string(), close + 2))
}

/// `~~strikethrough~~`
fn strikethrough(scanner: &mut Scanner, i: usize) -> Option<Match> {
    let (content, end) = delimited(scanner, i, Closer::Tildes)?;
    Some(Match {
        end,
        span: Span::Strikethrough { text: content },
    })
}

/// `**bold**`
fn bold(scanner: &mut Scanner, i: usize) -> Option<Match> {
    let (content, end) = delimited(scanner, i, Closer::Stars)?;
    Some(Match {
        end,
        span: Span::Bold { text: content },
    })
}

/// `*italic*`, where neither asterisk touches another asterisk.
fn italic(scanner: &mut Scanner, i: usize) -> Option<Match> {
    if !lone_star(scanner.bytes(), i) {
        return None;
    }
    let close = scanner.next(Closer::LoneStar, i + 2)?;
    Some(Match {
        end: close + 1,
        span: Span::Italic {
            text: scanner.text[i + 1..close].to_string(),
        },
    })
}
