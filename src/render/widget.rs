use serde::Serialize;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use super::{Capabilities, Renderer, truncate_spans};
use crate::block::{Block, Document, ListKind, Span};
use crate::config::WidgetConfig;

const INDENT_COLUMNS: usize = 2;
const CELL_SEPARATOR: &str = " │ ";

/// Text style of a widget row. Heading levels 5 and 6 share a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetStyle {
    Title,
    Headline,
    Subheadline,
    Emphasis,
    Caption,
    Body,
    Code,
    Quote,
    Divider,
}

impl WidgetStyle {
    pub fn for_heading(level: u8) -> Self {
        match level {
            1 => WidgetStyle::Title,
            2 => WidgetStyle::Headline,
            3 => WidgetStyle::Subheadline,
            4 => WidgetStyle::Emphasis,
            _ => WidgetStyle::Caption,
        }
    }
}

/// One row of the compact widget view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetRow {
    pub line: usize,
    pub indent: usize,
    pub style: WidgetStyle,
    /// Bullet, ordinal or checkbox glyph
    pub marker: Option<String>,
    /// Checklist state, for checklist rows
    pub checked: Option<bool>,
    pub content: Vec<Span>,
}

pub struct WidgetRenderer<'a> {
    config: &'a WidgetConfig,
    line_limit: Option<usize>,
}

impl<'a> WidgetRenderer<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        let line_limit = (config.line_limit > 0).then_some(config.line_limit);
        Self { config, line_limit }
    }

    /// Override the configured line limit. As in the config, 0 means no limit.
    pub fn with_line_limit(mut self, line_limit: Option<usize>) -> Self {
        self.line_limit = line_limit.filter(|&limit| limit > 0);
        self
    }

    fn rows_for(&self, line: usize, block: &Block, rows: &mut Vec<WidgetRow>) {
        let row = |indent: usize,
                   style: WidgetStyle,
                   marker: Option<String>,
                   checked: Option<bool>,
                   content: Vec<Span>| {
            self.fit(WidgetRow {
                line,
                indent,
                style,
                marker,
                checked,
                content,
            })
        };

        match block {
            Block::Heading { level, content } => {
                rows.push(row(0, WidgetStyle::for_heading(*level), None, None, content.clone()))
            }
            Block::ListItem {
                kind,
                checked,
                indent,
                ordinal,
                content,
            } => {
                let (marker, checked) = match kind {
                    ListKind::Unordered => ("•".to_string(), None),
                    ListKind::Ordered => (ordinal.clone().unwrap_or_default(), None),
                    ListKind::Checklist if *checked && self.config.hide_completed => return,
                    ListKind::Checklist => {
                        let glyph = if *checked { "☑" } else { "☐" };
                        (glyph.to_string(), Some(*checked))
                    }
                };
                rows.push(row(
                    *indent,
                    WidgetStyle::Body,
                    Some(marker),
                    checked,
                    content.clone(),
                ))
            }
            Block::TableRow { cells, is_header } => {
                let mut content = Vec::new();
                for (i, cell) in cells.iter().enumerate() {
                    if i > 0 {
                        content.push(Span::text(CELL_SEPARATOR));
                    }
                    content.extend(cell.iter().cloned());
                }
                let style = if *is_header {
                    WidgetStyle::Emphasis
                } else {
                    WidgetStyle::Body
                };
                rows.push(row(0, style, None, None, content))
            }
            Block::CodeBlock { lines, .. } => {
                for (offset, code) in lines.iter().enumerate() {
                    // the fence line itself comes first
                    rows.push(self.fit(WidgetRow {
                        line: line + 1 + offset,
                        indent: 0,
                        style: WidgetStyle::Code,
                        marker: None,
                        checked: None,
                        content: vec![Span::Code { text: code.clone() }],
                    }));
                }
            }
            Block::Blockquote { content } => {
                rows.push(row(0, WidgetStyle::Quote, None, None, content.clone()))
            }
            Block::Rule => rows.push(row(0, WidgetStyle::Divider, None, None, Vec::new())),
            Block::Paragraph { content } => {
                rows.push(row(0, WidgetStyle::Body, None, None, content.clone()))
            }
        }
    }

    /// Truncate the row's content to the columns left after indent and marker.
    fn fit(&self, mut row: WidgetRow) -> WidgetRow {
        let marker = row.marker.as_deref().map_or(0, |m| m.width() + 1);
        let budget = self
            .config
            .max_columns
            .saturating_sub(row.indent * INDENT_COLUMNS + marker);
        row.content = truncate_spans(&row.content, budget);
        row
    }
}

impl Renderer for WidgetRenderer<'_> {
    type Output = Vec<WidgetRow>;

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            measure_width: true,
            paginate: false,
            line_limit: self.line_limit,
            images: false,
        }
    }

    fn render(&self, document: &Document) -> Vec<WidgetRow> {
        let mut rows = Vec::new();
        for source in &document.blocks {
            self.rows_for(source.line(), &source.block, &mut rows);
        }
        debug!(rows = rows.len(), "rendered widget view");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::plain_text;
    use crate::render::render_source;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str, config: &WidgetConfig) -> Vec<WidgetRow> {
        render_source(&WidgetRenderer::new(config), markdown)
    }

    #[test]
    fn line_limit_applies_to_raw_source() {
        let config = WidgetConfig {
            line_limit: 3,
            ..WidgetConfig::default()
        };
        let rows = render("one\n\n![img](a.png)\nfour\nfive", &config);
        assert_eq!(rows.len(), 1);
        assert_eq!(plain_text(&rows[0].content), "one");
    }

    #[test]
    fn limit_override() {
        let config = WidgetConfig::default();
        let renderer = WidgetRenderer::new(&config).with_line_limit(Some(1));
        let rows = render_source(&renderer, "a\nb\nc");
        assert_eq!(rows.len(), 1);

        let renderer = WidgetRenderer::new(&config).with_line_limit(None);
        assert_eq!(renderer.capabilities().line_limit, None);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let config = WidgetConfig {
            line_limit: 0,
            ..WidgetConfig::default()
        };
        assert_eq!(render("a\nb\nc", &config).len(), 3);

        let default_config = WidgetConfig::default();
        let renderer = WidgetRenderer::new(&default_config).with_line_limit(Some(0));
        assert_eq!(renderer.capabilities().line_limit, None);
        assert_eq!(render_source(&renderer, "a\nb\nc").len(), 3);
    }

    #[test]
    fn minor_headings_share_style() {
        let rows = render("##### five\n###### six\n#### four", &WidgetConfig::default());
        assert_eq!(rows[0].style, WidgetStyle::Caption);
        assert_eq!(rows[1].style, WidgetStyle::Caption);
        assert_eq!(rows[2].style, WidgetStyle::Emphasis);
    }

    #[test]
    fn markers() {
        let rows = render(
            "- bullet\n1. first\n  1. nested\n- [x] done\n- [ ] open",
            &WidgetConfig::default(),
        );
        let markers: Vec<_> = rows.iter().map(|r| r.marker.clone().unwrap_or_default()).collect();
        assert_eq!(markers, vec!["•", "1.", "①", "☑", "☐"]);
        assert_eq!(rows[3].checked, Some(true));
        assert_eq!(rows[2].indent, 1);
    }

    #[test]
    fn hide_completed_items() {
        let config = WidgetConfig {
            hide_completed: true,
            ..WidgetConfig::default()
        };
        let rows = render("- [x] done\n- [ ] open", &config);
        assert_eq!(rows.len(), 1);
        assert_eq!(plain_text(&rows[0].content), "open");
    }

    #[test]
    fn long_rows_are_truncated() {
        let config = WidgetConfig {
            max_columns: 10,
            ..WidgetConfig::default()
        };
        let rows = render("abcdefghijklmnop\n  - nested item text", &config);
        assert_eq!(plain_text(&rows[0].content), "abcdefghi…");
        // 10 columns minus 2 for indent and 2 for the bullet
        assert_eq!(plain_text(&rows[1].content), "neste…");
    }

    #[test]
    fn code_lines_stay_literal() {
        let rows = render("```\n**not bold**\n```", &WidgetConfig::default());
        assert_eq!(
            rows,
            vec![WidgetRow {
                line: 1,
                indent: 0,
                style: WidgetStyle::Code,
                marker: None,
                checked: None,
                content: vec![Span::Code {
                    text: "**not bold**".into()
                }],
            }]
        );
    }

    #[test]
    fn table_rows_join_cells() {
        let rows = render("|a|b|\n|-|-|\n|1|2|", &WidgetConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].style, WidgetStyle::Emphasis);
        assert_eq!(plain_text(&rows[1].content), "1 │ 2");
    }
}
