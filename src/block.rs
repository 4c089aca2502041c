use std::ops::Range;

use serde::Serialize;

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Span {
    Text { text: String },
    Code { text: String },
    Bold { text: String },
    Italic { text: String },
    Strikethrough { text: String },
    Link { text: String, href: String },
}

impl Span {
    pub fn text(text: impl Into<String>) -> Self {
        Span::Text { text: text.into() }
    }

    /// The visible text of the span, delimiters removed.
    pub fn content(&self) -> &str {
        match self {
            Span::Text { text }
            | Span::Code { text }
            | Span::Bold { text }
            | Span::Italic { text }
            | Span::Strikethrough { text }
            | Span::Link { text, .. } => text,
        }
    }
}

/// Concatenated visible text of a span sequence.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::content).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Unordered,
    Ordered,
    Checklist,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    ListItem {
        kind: ListKind,
        /// Only meaningful for checklist items
        checked: bool,
        indent: usize,
        /// Formatted ordinal, set for ordered items only
        ordinal: Option<String>,
        content: Vec<Span>,
    },
    TableRow {
        cells: Vec<Vec<Span>>,
        is_header: bool,
    },
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Blockquote {
        content: Vec<Span>,
    },
    Rule,
    Paragraph {
        content: Vec<Span>,
    },
}

impl Block {
    /// Inline content of blocks that carry a single span sequence.
    pub fn spans(&self) -> Option<&[Span]> {
        match self {
            Block::Heading { content, .. }
            | Block::ListItem { content, .. }
            | Block::Blockquote { content }
            | Block::Paragraph { content } => Some(content),
            Block::TableRow { .. } | Block::CodeBlock { .. } | Block::Rule => None,
        }
    }
}

/// A block together with the source lines it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlock {
    /// 0-based, end-exclusive line range in the source text.
    pub lines: Range<usize>,
    pub block: Block,
}

impl SourceBlock {
    /// First source line of the block.
    pub fn line(&self) -> usize {
        self.lines.start
    }
}

/// Why a line produced no block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Skip {
    Blank,
    Image { alt: String, src: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: Skip,
}

/// A parsed markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<SourceBlock>,
    pub skipped: Vec<SkippedLine>,
    /// Number of raw source lines consumed (after any line limit).
    pub line_count: usize,
}

impl Document {
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|b| &b.block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
