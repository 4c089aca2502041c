//! Checklist toggling on raw source text.

use tracing::debug;

use crate::classify::CHECKLIST_PREFIXES;

/// Flip the checklist item on `line` (0-based) and return the updated text.
///
/// Returns `None` when the line does not exist or is not a checklist item.
/// Every other byte of `source`, line endings included, is preserved.
pub fn try_toggle_checklist(source: &str, line: usize) -> Option<String> {
    let mut lines: Vec<&str> = source.split('\n').collect();
    let target = *lines.get(line)?;

    let body = target.trim_start();
    let (prefix, checked) = CHECKLIST_PREFIXES
        .iter()
        .find(|(prefix, _)| body.starts_with(prefix))?;
    let replacement = if *checked { "- [ ] " } else { "- [x] " };

    let at = target.find(prefix)?;
    let toggled = format!(
        "{}{}{}",
        &target[..at],
        replacement,
        &target[at + prefix.len()..]
    );
    lines[line] = &toggled;
    debug!(line, checked = !checked, "toggled checklist item");
    Some(lines.join("\n"))
}

/// Flip the checklist item on `line`, or return `source` unchanged when there
/// is nothing to toggle.
pub fn toggle_checklist(source: &str, line: usize) -> String {
    try_toggle_checklist(source, line).unwrap_or_else(|| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_back_and_forth() {
        let once = toggle_checklist("- [ ] task", 0);
        assert_eq!(once, "- [x] task");
        assert_eq!(toggle_checklist(&once, 0), "- [ ] task");
    }

    #[test]
    fn uppercase_mark_unchecks() {
        assert_eq!(toggle_checklist("- [X] done", 0), "- [ ] done");
    }

    #[test]
    fn targets_only_the_given_line() {
        let source = "# List\n- [ ] a\n\t- [ ] b\n- [ ] c\n";
        assert_eq!(
            toggle_checklist(source, 2),
            "# List\n- [ ] a\n\t- [x] b\n- [ ] c\n"
        );
    }

    #[test]
    fn keeps_crlf_line_endings() {
        assert_eq!(
            toggle_checklist("- [ ] a\r\n- [ ] b\r\n", 1),
            "- [ ] a\r\n- [x] b\r\n"
        );
    }

    #[test]
    fn only_the_prefix_is_replaced() {
        assert_eq!(
            toggle_checklist("- [ ] write - [ ] docs", 0),
            "- [x] write - [ ] docs"
        );
    }

    #[test]
    fn no_op_cases() {
        let source = "- [ ] task\nplain - [ ] text\n- item";
        assert_eq!(toggle_checklist(source, 7), source);
        assert_eq!(toggle_checklist(source, 1), source);
        assert_eq!(toggle_checklist(source, 2), source);
        assert_eq!(try_toggle_checklist(source, 1), None);
        assert_eq!(toggle_checklist("", 0), "");
    }
}
