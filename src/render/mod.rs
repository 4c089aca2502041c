//! Renderers turning a parsed [`Document`] into target-specific models.
//!
//! All three targets share the same parse; they differ only in what they can
//! do with it, which [`Capabilities`] describes.

pub mod editor;
pub mod print;
pub mod widget;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::block::{Block, Document, SourceBlock, Span};
use crate::parser::parse_with_limit;

pub use editor::{EditorRenderer, ViewItem, ViewKind};
pub use print::{Chapter, OutlineEntry, Page, PrintDocument, PrintItem, PrintRenderer};
pub use widget::{WidgetRenderer, WidgetRow, WidgetStyle};

/// What a renderer does with a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Uses display widths of text
    pub measure_width: bool,
    /// Splits output into pages
    pub paginate: bool,
    /// Raw source lines to consider before parsing
    pub line_limit: Option<usize>,
    /// Emits image placeholders
    pub images: bool,
}

pub trait Renderer {
    type Output;

    fn capabilities(&self) -> Capabilities;

    fn render(&self, document: &Document) -> Self::Output;
}

/// Parse `markdown` under the renderer's line limit and render it.
pub fn render_source<R: Renderer>(renderer: &R, markdown: &str) -> R::Output {
    let document = parse_with_limit(markdown, renderer.capabilities().line_limit);
    renderer.render(&document)
}

/// Display width of a span sequence in terminal columns.
pub fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|span| span.content().width()).sum()
}

/// Cut `spans` so their display width fits `budget`, marking the cut with `…`.
///
/// Returns the spans unchanged when they already fit.
pub fn truncate_spans(spans: &[Span], budget: usize) -> Vec<Span> {
    if spans_width(spans) <= budget {
        return spans.to_vec();
    }
    // leave room for the ellipsis
    let mut remaining = budget.saturating_sub(1);
    let mut out = Vec::new();
    for span in spans {
        let width = span.content().width();
        if width <= remaining {
            out.push(span.clone());
            remaining -= width;
            continue;
        }
        let mut cut = String::new();
        for ch in span.content().chars() {
            let w = ch.width().unwrap_or(0);
            if w > remaining {
                break;
            }
            cut.push(ch);
            remaining -= w;
        }
        cut.push('…');
        out.push(with_content(span, cut));
        return out;
    }
    out
}

/// Whether `next` is the row after `previous` in the same table.
///
/// Rows sit on consecutive lines, except that the dropped separator line sits
/// between a header and the first body row.
pub(crate) fn continues_table(previous: &SourceBlock, next: &SourceBlock) -> bool {
    let Block::TableRow { is_header, .. } = previous.block else {
        return false;
    };
    if !matches!(next.block, Block::TableRow { .. }) {
        return false;
    }
    let gap = usize::from(is_header);
    next.line() == previous.lines.end + gap
}

fn with_content(span: &Span, text: String) -> Span {
    match span {
        Span::Text { .. } => Span::Text { text },
        Span::Code { .. } => Span::Code { text },
        Span::Bold { .. } => Span::Bold { text },
        Span::Italic { .. } => Span::Italic { text },
        Span::Strikethrough { .. } => Span::Strikethrough { text },
        Span::Link { href, .. } => Span::Link {
            text,
            href: href.clone(),
        },
    }
}
