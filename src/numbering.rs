//! Display forms for ordered-list ordinals.
//!
//! Each indent level uses its own numbering style so nested sequences stay
//! visually distinct: `1.` at the top, `①` one level in, `iv.` and `c.` deeper.

const ROMAN: [(usize, &str); 7] = [
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

/// Format `ordinal` for the given indent level, without a trailing suffix.
///
/// Values outside a style's range fall back to arabic digits.
pub fn format_number(ordinal: usize, level: usize) -> String {
    let styled = match level {
        1 => circled(ordinal).map(String::from),
        2 => roman(ordinal),
        3 => alpha(ordinal).map(String::from),
        _ => None,
    };
    styled.unwrap_or_else(|| ordinal.to_string())
}

/// Format `ordinal` for display in front of a list item.
///
/// Circled glyphs stand on their own; every other form is followed by a period.
pub fn ordinal_display(ordinal: usize, level: usize) -> String {
    if level == 1 && circled(ordinal).is_some() {
        format_number(ordinal, level)
    } else {
        format!("{}.", format_number(ordinal, level))
    }
}

fn circled(n: usize) -> Option<char> {
    let code = match n {
        1..=20 => 0x2460 + (n as u32 - 1),
        21..=35 => 0x3251 + (n as u32 - 21),
        36..=50 => 0x32B1 + (n as u32 - 36),
        _ => return None,
    };
    char::from_u32(code)
}

fn roman(n: usize) -> Option<String> {
    if !(1..=50).contains(&n) {
        return None;
    }
    let mut rest = n;
    let mut out = String::new();
    for (value, symbol) in ROMAN {
        while rest >= value {
            out.push_str(symbol);
            rest -= value;
        }
    }
    Some(out)
}

fn alpha(n: usize) -> Option<char> {
    match n {
        1..=26 => Some((b'a' + (n as u8 - 1)) as char),
        _ => None,
    }
}
