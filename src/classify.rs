use crate::block::Skip;

pub const FENCE: &str = "```";

/// Checklist prefixes, unchecked first.
pub const CHECKLIST_PREFIXES: [(&str, bool); 3] =
    [("- [ ] ", false), ("- [x] ", true), ("- [X] ", true)];

const BULLET_PREFIXES: [&str; 3] = ["- ", "* ", "+ "];

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    FenceOpen { language: Option<&'a str> },
    FenceClose,
    /// Raw line inside an open fence
    Code(&'a str),
    Skip(Skip),
    Rule,
    /// Trimmed line, pipes included
    TableRow(&'a str),
    Heading { level: u8, text: &'a str },
    Checklist { checked: bool, indent: usize, text: &'a str },
    Unordered { indent: usize, text: &'a str },
    Ordered { indent: usize, text: &'a str },
    Blockquote(&'a str),
    Paragraph(&'a str),
}

/// Classify `line` given whether a code fence is currently open.
pub fn classify(line: &str, in_fence: bool) -> LineClass<'_> {
    let trimmed = line.trim();

    if trimmed.starts_with(FENCE) {
        if in_fence {
            return LineClass::FenceClose;
        }
        let language = trimmed[FENCE.len()..].trim();
        return LineClass::FenceOpen {
            language: (!language.is_empty()).then_some(language),
        };
    }
    if in_fence {
        return LineClass::Code(line);
    }

    if trimmed.is_empty() {
        return LineClass::Skip(Skip::Blank);
    }
    if let Some(image) = image(trimmed) {
        return LineClass::Skip(image);
    }
    if matches!(trimmed, "---" | "***" | "___") {
        return LineClass::Rule;
    }
    if trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|') {
        return LineClass::TableRow(trimmed);
    }

    let body = line.trim_start();
    if let Some((level, text)) = heading(body) {
        return LineClass::Heading { level, text };
    }

    let indent = indent_level(line);
    if let Some((prefix, checked)) = CHECKLIST_PREFIXES
        .iter()
        .find(|(prefix, _)| body.starts_with(prefix))
    {
        return LineClass::Checklist {
            checked: *checked,
            indent,
            text: body[prefix.len()..].trim(),
        };
    }
    if let Some(prefix) = BULLET_PREFIXES.iter().find(|p| body.starts_with(*p)) {
        return LineClass::Unordered {
            indent,
            text: body[prefix.len()..].trim(),
        };
    }
    if let Some(text) = ordered(body) {
        return LineClass::Ordered { indent, text };
    }
    if let Some(quoted) = body.strip_prefix('>') {
        let quoted = quoted.strip_prefix(' ').unwrap_or(quoted);
        return LineClass::Blockquote(quoted.trim_end());
    }

    LineClass::Paragraph(trimmed)
}

/// Nesting depth from leading whitespace.
///
/// Each tab is one level; each run of spaces contributes half its length
/// (rounded down), so a lone space counts for nothing.
pub fn indent_level(line: &str) -> usize {
    let mut level = 0;
    let mut spaces = 0;
    for ch in line.chars() {
        match ch {
            '\t' => {
                level += spaces / 2 + 1;
                spaces = 0;
            }
            ' ' => spaces += 1,
            _ => break,
        }
    }
    level + spaces / 2
}

fn heading(body: &str) -> Option<(u8, &str)> {
    let hashes = body.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || body.as_bytes().get(hashes) != Some(&b' ') {
        return None;
    }
    let level = hashes.min(6) as u8;
    Some((level, body[hashes + 1..].trim()))
}

fn ordered(body: &str) -> Option<&str> {
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    body[digits..].strip_prefix(". ").map(str::trim)
}

/// An image-only line: both `![` and `](` present.
fn image(trimmed: &str) -> Option<Skip> {
    let open = trimmed.find("![")?;
    if !trimmed.contains("](") {
        return None;
    }
    let (alt, src) = match trimmed[open..].find("](") {
        Some(middle) => {
            let middle = middle + open;
            let rest = &trimmed[middle + 2..];
            let src = rest.find(')').map_or(rest, |close| &rest[..close]);
            (&trimmed[open + 2..middle], src)
        }
        None => ("", ""),
    };
    Some(Skip::Image {
        alt: alt.to_string(),
        src: src.to_string(),
    })
}
