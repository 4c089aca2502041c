use crate::block::{Block, ListKind, Span};
use crate::config::Config;
use crate::render::{PrintDocument, PrintItem, continues_table};

/// Convert a paginated print document to Typst markup
pub fn print_to_typst(document: &PrintDocument, config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    for (page_index, page) in document.pages.iter().enumerate() {
        if page_index > 0 {
            out.push_str("#pagebreak()\n\n");
        }

        let items = &page.items;
        let mut i = 0;
        while i < items.len() {
            match &items[i].source.block {
                Block::TableRow { .. } => {
                    let mut end = i + 1;
                    while end < items.len()
                        && continues_table(&items[end - 1].source, &items[end].source)
                    {
                        end += 1;
                    }
                    // Keep tables together when possible
                    out.push_str("#block(breakable: false)[\n");
                    table_to_typst(&items[i..end], &mut out);
                    out.push_str("]\n\n");
                    i = end;
                    continue;
                }
                _ => emit_item(&items[i], &mut out),
            }
            i += 1;
        }
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.print.page_numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str(&format!(
        "#show link: set text(fill: rgb(\"{}\"))\n",
        escape_string(&config.links.color)
    ));
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
}

fn emit_item(item: &PrintItem, out: &mut String) {
    match &item.source.block {
        Block::Heading { level, content } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            if let Some(chapter) = item.chapter {
                out.push_str(&chapter.to_string());
                out.push(' ');
            }
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::ListItem {
            kind,
            checked,
            indent,
            ordinal,
            content,
        } => {
            let marker = match kind {
                ListKind::Unordered => "•".to_string(),
                ListKind::Ordered => ordinal.clone().unwrap_or_default(),
                ListKind::Checklist if *checked => "☑".to_string(),
                ListKind::Checklist => "☐".to_string(),
            };
            // Markers go through a string literal so `1.` is not read as list syntax
            out.push_str(&format!(
                "#pad(left: {}em)[#\"{}\" ",
                *indent as f32 * 1.5,
                escape_string(&marker)
            ));
            spans_to_typst(content, out);
            out.push_str("]\n\n");
        }
        Block::CodeBlock { language, lines } => {
            // Keep code blocks together when possible
            out.push_str("#block(breakable: false)[\n```");
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("```\n]\n\n");
        }
        Block::Blockquote { content } => {
            out.push_str("#quote(block: true)[");
            spans_to_typst(content, out);
            out.push_str("]\n\n");
        }
        Block::Rule => {
            out.push_str("#line(length: 100%)\n\n");
        }
        Block::TableRow { .. } => {
            table_to_typst(std::slice::from_ref(item), out);
        }
    }
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for (i, span) in spans.iter().enumerate() {
        span_to_typst(span, i == 0, out);
    }
}

fn span_to_typst(span: &Span, at_start: bool, out: &mut String) {
    match span {
        Span::Text { text } if at_start => escape_leading(text, out),
        Span::Text { text } => escape_markup(text, out),
        Span::Bold { text } => {
            out.push_str("#strong[");
            escape_leading(text, out);
            out.push(']');
        }
        Span::Italic { text } => {
            out.push_str("#emph[");
            escape_leading(text, out);
            out.push(']');
        }
        Span::Strikethrough { text } => {
            out.push_str("#strike[");
            escape_leading(text, out);
            out.push(']');
        }
        Span::Code { text } => {
            out.push('`');
            out.push_str(text);
            out.push('`');
        }
        Span::Link { text, href } => {
            out.push_str(&format!("#link(\"{}\")[", escape_string(href)));
            escape_leading(text, out);
            out.push(']');
        }
    }
}

/// Escape text that opens a line or content block, where a leading `-`, `+`
/// or `1.` followed by a space would start a list
fn escape_leading(text: &str, out: &mut String) {
    let body = text.trim_start();
    out.push_str(&text[..text.len() - body.len()]);

    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    let marker_len = if body.starts_with(['-', '+']) {
        1
    } else if digits > 0 && body[digits..].starts_with('.') {
        digits + 1
    } else {
        0
    };
    let is_marker = marker_len > 0
        && body[marker_len..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
    if !is_marker {
        escape_markup(body, out);
        return;
    }

    out.push_str(&body[..marker_len - 1]);
    out.push('\\');
    out.push_str(&body[marker_len - 1..marker_len]);
    escape_markup(&body[marker_len..], out);
}

/// Escape special Typst characters in markup text
fn escape_markup(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~'
            | '=' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Escape text for a Typst string literal
fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn table_to_typst(rows: &[PrintItem], out: &mut String) {
    let col_count = rows
        .iter()
        .filter_map(|item| match &item.source.block {
            Block::TableRow { cells, .. } => Some(cells.len()),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    for item in rows {
        let Block::TableRow { cells, is_header } = &item.source.block else {
            continue;
        };
        for column in 0..col_count {
            out.push_str("  [");
            if let Some(cell) = cells.get(column) {
                // Header cells (bold)
                if *is_header {
                    out.push_str("#strong[");
                    spans_to_typst(cell, out);
                    out.push(']');
                } else {
                    spans_to_typst(cell, out);
                }
            }
            out.push_str("],\n");
        }
    }

    out.push_str(")\n");
}
