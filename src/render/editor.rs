use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use super::{Capabilities, Renderer, continues_table, spans_width};
use crate::block::{Block, Document, ListKind, Skip, SourceBlock, Span};
use crate::config::EditorConfig;

/// One element of the interactive editor/preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewItem {
    /// First source line, used to route interactions back to the text
    pub line: usize,
    pub lines: Range<usize>,
    pub indent: usize,
    /// Horizontal offset in points
    pub offset: f32,
    pub kind: ViewKind,
}

impl ViewItem {
    /// Source line to pass to the checklist toggle, for checklist items.
    pub fn toggle_line(&self) -> Option<usize> {
        matches!(self.kind, ViewKind::Checklist { .. }).then_some(self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewKind {
    Heading {
        level: u8,
        font_size: f32,
        content: Vec<Span>,
    },
    Bullet {
        size: f32,
        content: Vec<Span>,
    },
    Numbered {
        ordinal: String,
        content: Vec<Span>,
    },
    Checklist {
        checked: bool,
        size: f32,
        content: Vec<Span>,
    },
    TableRow {
        cells: Vec<Vec<Span>>,
        is_header: bool,
        /// Widest cell per column across the whole table, in columns
        column_widths: Vec<usize>,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Quote {
        content: Vec<Span>,
    },
    Rule,
    Paragraph {
        content: Vec<Span>,
    },
    Spacer,
    Image {
        alt: String,
        src: String,
    },
}

pub struct EditorRenderer<'a> {
    config: &'a EditorConfig,
}

impl<'a> EditorRenderer<'a> {
    pub fn new(config: &'a EditorConfig) -> Self {
        Self { config }
    }

    fn item(&self, source: &SourceBlock, column_widths: &[usize]) -> ViewItem {
        let (indent, kind) = match &source.block {
            Block::Heading { level, content } => (
                0,
                ViewKind::Heading {
                    level: *level,
                    font_size: self.config.heading_size(*level),
                    content: content.clone(),
                },
            ),
            Block::ListItem {
                kind,
                checked,
                indent,
                ordinal,
                content,
            } => {
                let content = content.clone();
                let view = match kind {
                    ListKind::Unordered => ViewKind::Bullet {
                        size: self.config.bullet_size,
                        content,
                    },
                    ListKind::Ordered => ViewKind::Numbered {
                        ordinal: ordinal.clone().unwrap_or_default(),
                        content,
                    },
                    ListKind::Checklist => ViewKind::Checklist {
                        checked: *checked,
                        size: self.config.checkbox_size,
                        content,
                    },
                };
                (*indent, view)
            }
            Block::TableRow { cells, is_header } => (
                0,
                ViewKind::TableRow {
                    cells: cells.clone(),
                    is_header: *is_header,
                    column_widths: column_widths.to_vec(),
                },
            ),
            Block::CodeBlock { language, lines } => (
                0,
                ViewKind::Code {
                    language: language.clone(),
                    lines: lines.clone(),
                },
            ),
            Block::Blockquote { content } => (
                0,
                ViewKind::Quote {
                    content: content.clone(),
                },
            ),
            Block::Rule => (0, ViewKind::Rule),
            Block::Paragraph { content } => (
                0,
                ViewKind::Paragraph {
                    content: content.clone(),
                },
            ),
        };
        ViewItem {
            line: source.line(),
            lines: source.lines.clone(),
            indent,
            offset: indent as f32 * self.config.indent_width,
            kind,
        }
    }

    fn skipped_item(&self, line: usize, reason: &Skip) -> Option<ViewItem> {
        let kind = match reason {
            Skip::Blank if self.config.preserve_blank_lines => ViewKind::Spacer,
            Skip::Image { alt, src } if self.config.show_images => ViewKind::Image {
                alt: alt.clone(),
                src: src.clone(),
            },
            _ => return None,
        };
        Some(ViewItem {
            line,
            lines: line..line + 1,
            indent: 0,
            offset: 0.0,
            kind,
        })
    }
}

impl Renderer for EditorRenderer<'_> {
    type Output = Vec<ViewItem>;

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            measure_width: true,
            paginate: false,
            line_limit: None,
            images: self.config.show_images,
        }
    }

    fn render(&self, document: &Document) -> Vec<ViewItem> {
        let widths = table_column_widths(&document.blocks);
        let mut items: Vec<ViewItem> = document
            .blocks
            .iter()
            .zip(&widths)
            .map(|(source, widths)| self.item(source, widths))
            .collect();

        items.extend(
            document
                .skipped
                .iter()
                .filter_map(|skipped| self.skipped_item(skipped.line, &skipped.reason)),
        );
        items.sort_by_key(|item| item.line);

        debug!(items = items.len(), "rendered editor view");
        items
    }
}

/// Column widths for each block: the table-wide maxima for table rows, empty
/// for everything else.
fn table_column_widths(blocks: &[SourceBlock]) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); blocks.len()];
    let mut start = 0;
    while start < blocks.len() {
        if !matches!(blocks[start].block, Block::TableRow { .. }) {
            start += 1;
            continue;
        }
        // a table is a run of rows on consecutive lines; only the dropped
        // separator may sit between a header and the next row
        let mut end = start + 1;
        while end < blocks.len() && continues_table(&blocks[end - 1], &blocks[end]) {
            end += 1;
        }

        let mut widths: Vec<usize> = Vec::new();
        for source in &blocks[start..end] {
            if let Block::TableRow { cells, .. } = &source.block {
                for (column, cell) in cells.iter().enumerate() {
                    let width = spans_width(cell);
                    match widths.get_mut(column) {
                        Some(max) => *max = (*max).max(width),
                        None => widths.push(width),
                    }
                }
            }
        }
        for slot in &mut out[start..end] {
            slot.clone_from(&widths);
        }
        start = end;
    }
    out
}
