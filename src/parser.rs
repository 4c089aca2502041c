use std::collections::BTreeMap;
use std::ops::Range;

use tracing::{debug, trace};

use crate::block::{Block, Document, ListKind, SkippedLine, SourceBlock};
use crate::classify::{LineClass, classify};
use crate::inline::tokenize;
use crate::numbering::ordinal_display;

/// Parse markdown text into a document
pub fn parse(markdown: &str) -> Document {
    parse_with_limit(markdown, None)
}

/// Parse at most the first `limit` raw lines of `markdown`.
///
/// Truncation happens before classification, so a table or code fence cut by
/// the limit is assembled from whatever lines made it in.
pub fn parse_with_limit(markdown: &str, limit: Option<usize>) -> Document {
    let mut state = ParseState::default();

    for (index, line) in markdown.lines().take(limit.unwrap_or(usize::MAX)).enumerate() {
        state.line_count = index + 1;
        process_line(index, line, &mut state);
    }

    let document = state.finish();
    debug!(
        lines = document.line_count,
        blocks = document.blocks.len(),
        skipped = document.skipped.len(),
        "parsed document"
    );
    document
}

/// Last emitted ordinal per indent level.
#[derive(Debug, Default)]
pub struct IndentCounters(BTreeMap<usize, usize>);

impl IndentCounters {
    /// Advance the counter at `level`, forgetting every deeper level.
    pub fn next(&mut self, level: usize) -> usize {
        self.0.split_off(&(level + 1));
        let counter = self.0.entry(level).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[derive(Default)]
struct ParseState<'a> {
    blocks: Vec<SourceBlock>,
    skipped: Vec<SkippedLine>,
    line_count: usize,

    // Open code fence
    code: Option<CodeBuffer>,

    // Consecutive table rows awaiting assembly
    table: Vec<(usize, &'a str)>,

    counters: IndentCounters,
}

struct CodeBuffer {
    start: usize,
    language: Option<String>,
    lines: Vec<String>,
}

impl ParseState<'_> {
    fn push(&mut self, lines: Range<usize>, block: Block) {
        self.blocks.push(SourceBlock { lines, block });
    }

    fn close_code(&mut self, end: usize) {
        if let Some(code) = self.code.take() {
            self.push(
                code.start..end,
                Block::CodeBlock {
                    language: code.language,
                    lines: code.lines,
                },
            );
        }
    }

    fn flush_table(&mut self) {
        if self.table.is_empty() {
            return;
        }
        let mut rows: Vec<(usize, Vec<&str>)> = std::mem::take(&mut self.table)
            .into_iter()
            .map(|(line, row)| (line, split_row(row)))
            .collect();

        let has_header = rows.get(1).is_some_and(|(_, cells)| is_separator(cells));
        if has_header {
            rows.remove(1);
        }

        for (i, (line, cells)) in rows.into_iter().enumerate() {
            let cells = cells.into_iter().map(tokenize).collect();
            self.push(
                line..line + 1,
                Block::TableRow {
                    cells,
                    is_header: has_header && i == 0,
                },
            );
        }
    }

    fn finish(mut self) -> Document {
        self.flush_table();
        let end = self.line_count;
        self.close_code(end);
        Document {
            blocks: self.blocks,
            skipped: self.skipped,
            line_count: self.line_count,
        }
    }
}

fn process_line<'a>(index: usize, line: &'a str, state: &mut ParseState<'a>) {
    let class = classify(line, state.code.is_some());
    trace!(line = index, ?class);

    if !matches!(class, LineClass::TableRow(_)) {
        state.flush_table();
    }

    let this_line = index..index + 1;
    match class {
        LineClass::FenceOpen { language } => {
            state.code = Some(CodeBuffer {
                start: index,
                language: language.map(str::to_string),
                lines: Vec::new(),
            });
        }
        LineClass::FenceClose => state.close_code(index + 1),
        LineClass::Code(raw) => {
            if let Some(code) = state.code.as_mut() {
                code.lines.push(raw.to_string());
            }
        }
        LineClass::Skip(reason) => state.skipped.push(SkippedLine {
            line: index,
            reason,
        }),
        LineClass::Rule => state.push(this_line, Block::Rule),
        LineClass::TableRow(row) => state.table.push((index, row)),
        LineClass::Heading { level, text } => state.push(
            this_line,
            Block::Heading {
                level,
                content: tokenize(text),
            },
        ),
        LineClass::Checklist {
            checked,
            indent,
            text,
        } => state.push(
            this_line,
            Block::ListItem {
                kind: ListKind::Checklist,
                checked,
                indent,
                ordinal: None,
                content: tokenize(text),
            },
        ),
        LineClass::Unordered { indent, text } => state.push(
            this_line,
            Block::ListItem {
                kind: ListKind::Unordered,
                checked: false,
                indent,
                ordinal: None,
                content: tokenize(text),
            },
        ),
        LineClass::Ordered { indent, text } => {
            let ordinal = state.counters.next(indent);
            state.push(
                this_line,
                Block::ListItem {
                    kind: ListKind::Ordered,
                    checked: false,
                    indent,
                    ordinal: Some(ordinal_display(ordinal, indent)),
                    content: tokenize(text),
                },
            );
        }
        LineClass::Blockquote(text) => state.push(
            this_line,
            Block::Blockquote {
                content: tokenize(text),
            },
        ),
        LineClass::Paragraph(text) => state.push(
            this_line,
            Block::Paragraph {
                content: tokenize(text),
            },
        ),
    }
}

/// Strip the outer pipes and split into trimmed cells.
fn split_row(row: &str) -> Vec<&str> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn is_separator(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|c| c == '-' || c == ':' || c.is_whitespace()))
}
