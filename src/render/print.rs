use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::{Capabilities, Renderer, spans_width};
use crate::block::{Block, Document, SourceBlock, plain_text};
use crate::config::PrintConfig;

/// Paragraph text that forces the following content onto a new page.
pub const PAGE_BREAK_MARKER: &str = "---pagebreak---";

/// Chapter number of a level-1 or level-2 heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub major: usize,
    pub minor: Option<usize>,
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.major, self.minor) {
            (major, None) => write!(f, "{major}"),
            (0, Some(minor)) => write!(f, "{minor}"),
            (major, Some(minor)) => write!(f, "{major}.{minor}"),
        }
    }
}

#[derive(Debug, Default)]
struct ChapterCounter {
    major: usize,
    minor: usize,
}

impl ChapterCounter {
    fn next(&mut self, level: u8) -> Option<Chapter> {
        match level {
            1 => {
                self.major += 1;
                self.minor = 0;
                Some(Chapter {
                    major: self.major,
                    minor: None,
                })
            }
            2 => {
                self.minor += 1;
                Some(Chapter {
                    major: self.major,
                    minor: Some(self.minor),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintItem {
    pub source: SourceBlock,
    pub chapter: Option<Chapter>,
    /// Estimated height in text lines
    pub cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub items: Vec<PrintItem>,
}

/// Table-of-contents entry for a numbered heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub chapter: Option<Chapter>,
    pub title: String,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintDocument {
    pub pages: Vec<Page>,
    pub outline: Vec<OutlineEntry>,
}

pub struct PrintRenderer<'a> {
    config: &'a PrintConfig,
}

impl<'a> PrintRenderer<'a> {
    pub fn new(config: &'a PrintConfig) -> Self {
        Self { config }
    }

    /// Estimated height of a block in text lines.
    fn cost(&self, block: &Block) -> usize {
        let width = self.config.chars_per_line.max(1);
        let wrapped = |columns: usize, indent: usize| {
            let available = width.saturating_sub(indent * 2).max(1);
            columns.div_ceil(available).max(1)
        };
        match block {
            Block::Heading { .. } => 2,
            Block::Paragraph { content } | Block::Blockquote { content } => {
                wrapped(spans_width(content), 0)
            }
            Block::ListItem {
                indent, content, ..
            } => wrapped(spans_width(content) + 2, *indent),
            Block::CodeBlock { lines, .. } => lines.len().max(1),
            Block::TableRow { is_header, .. } => 1 + usize::from(*is_header),
            Block::Rule => 1,
        }
    }
}

fn is_page_break(block: &Block) -> bool {
    matches!(block, Block::Paragraph { content } if plain_text(content).trim() == PAGE_BREAK_MARKER)
}

impl Renderer for PrintRenderer<'_> {
    type Output = PrintDocument;

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            measure_width: true,
            paginate: true,
            line_limit: None,
            images: false,
        }
    }

    fn render(&self, document: &Document) -> PrintDocument {
        let page_height = self.config.lines_per_page.max(1);
        let mut chapters = ChapterCounter::default();
        let mut pages = Vec::new();
        let mut outline = Vec::new();
        let mut current: Vec<PrintItem> = Vec::new();
        let mut used = 0;

        let blocks = &document.blocks;
        for (i, source) in blocks.iter().enumerate() {
            if is_page_break(&source.block) {
                if !current.is_empty() {
                    pages.push(std::mem::take(&mut current));
                    used = 0;
                }
                continue;
            }

            let cost = self.cost(&source.block);
            // keep a heading on the same page as whatever follows it
            let needed = match (&source.block, blocks.get(i + 1)) {
                (Block::Heading { .. }, Some(next)) if !is_page_break(&next.block) => {
                    cost + self.cost(&next.block)
                }
                _ => cost,
            };
            if used > 0 && used + needed > page_height {
                pages.push(std::mem::take(&mut current));
                used = 0;
            }

            let chapter = match &source.block {
                Block::Heading { level, content } if self.config.chapter_numbers => {
                    let chapter = chapters.next(*level);
                    if chapter.is_some() {
                        outline.push(OutlineEntry {
                            level: *level,
                            chapter,
                            title: plain_text(content),
                            page: pages.len() + 1,
                        });
                    }
                    chapter
                }
                _ => None,
            };

            current.push(PrintItem {
                source: source.clone(),
                chapter,
                cost,
            });
            used += cost;
        }
        if !current.is_empty() {
            pages.push(current);
        }

        let pages: Vec<Page> = pages
            .into_iter()
            .enumerate()
            .map(|(i, items)| Page {
                number: i + 1,
                items,
            })
            .collect();
        debug!(
            pages = pages.len(),
            chapters = outline.len(),
            "rendered print document"
        );
        PrintDocument { pages, outline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_source;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str, config: &PrintConfig) -> PrintDocument {
        render_source(&PrintRenderer::new(config), markdown)
    }

    fn chapters(document: &PrintDocument) -> Vec<String> {
        document
            .outline
            .iter()
            .filter_map(|entry| entry.chapter.map(|c| c.to_string()))
            .collect()
    }

    #[test]
    fn chapter_numbering() {
        let doc = render(
            "# Intro\n## Scope\n## Terms\n### Detail\n# Body\n## Part",
            &PrintConfig::default(),
        );
        assert_eq!(chapters(&doc), vec!["1", "1.1", "1.2", "2", "2.1"]);
        let heading_chapters: Vec<_> = doc.pages[0]
            .items
            .iter()
            .map(|item| item.chapter.map(|c| c.to_string()))
            .collect();
        assert_eq!(
            heading_chapters,
            vec![
                Some("1".to_string()),
                Some("1.1".to_string()),
                Some("1.2".to_string()),
                None,
                Some("2".to_string()),
                Some("2.1".to_string()),
            ]
        );
    }

    #[test]
    fn minor_heading_before_any_chapter() {
        let doc = render("## Preface\n# One", &PrintConfig::default());
        assert_eq!(chapters(&doc), vec!["1", "1"]);
        assert_eq!(
            doc.outline[0].chapter,
            Some(Chapter {
                major: 0,
                minor: Some(1)
            })
        );
    }

    #[test]
    fn chapter_numbers_can_be_disabled() {
        let config = PrintConfig {
            chapter_numbers: false,
            ..PrintConfig::default()
        };
        let doc = render("# A\n## B", &config);
        assert!(doc.outline.is_empty());
        assert!(doc.pages[0].items.iter().all(|item| item.chapter.is_none()));
    }

    #[test]
    fn list_numbering_is_independent_of_chapters() {
        let doc = render("# A\n1. x\n# B\n1. y", &PrintConfig::default());
        let ordinals: Vec<_> = doc.pages[0]
            .items
            .iter()
            .filter_map(|item| match &item.source.block {
                Block::ListItem { ordinal, .. } => ordinal.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(ordinals, vec!["1.", "2."]);
    }

    #[test]
    fn paginates_by_estimated_lines() {
        let config = PrintConfig {
            lines_per_page: 3,
            ..PrintConfig::default()
        };
        let doc = render("a\nb\nc\nd\ne", &config);
        let sizes: Vec<_> = doc.pages.iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(doc.pages[1].number, 2);
    }

    #[test]
    fn long_paragraphs_cost_more_lines() {
        let config = PrintConfig {
            chars_per_line: 10,
            ..PrintConfig::default()
        };
        let doc = render(&"x".repeat(25), &config);
        assert_eq!(doc.pages[0].items[0].cost, 3);
    }

    #[test]
    fn heading_moves_with_following_block() {
        let config = PrintConfig {
            lines_per_page: 4,
            ..PrintConfig::default()
        };
        // heading (2) + paragraph (1) does not fit after two paragraphs
        let doc = render("a\nb\n# H\nc", &config);
        assert_eq!(doc.pages.len(), 2);
        assert!(matches!(
            doc.pages[1].items[0].source.block,
            Block::Heading { .. }
        ));
        assert_eq!(doc.outline[0].page, 2);
    }

    #[test]
    fn oversize_block_gets_its_own_page() {
        let config = PrintConfig {
            lines_per_page: 2,
            ..PrintConfig::default()
        };
        let doc = render("a\n```\n1\n2\n3\n4\n```\nb", &config);
        let sizes: Vec<_> = doc.pages.iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, vec![1, 1, 1]);
    }

    #[test]
    fn page_break_marker() {
        let doc = render("a\n---pagebreak---\nb", &PrintConfig::default());
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].items.len(), 1);
    }

    #[test]
    fn empty_document_has_no_pages() {
        let doc = render("", &PrintConfig::default());
        assert!(doc.pages.is_empty());
    }
}
