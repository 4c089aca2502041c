mod block;
mod checklist;
mod classify;
mod config;
mod error;
mod inline;
mod numbering;
mod parser;
pub mod render;
mod typst;

pub use block::{
    Block, Document, ListKind, Skip, SkippedLine, SourceBlock, Span, plain_text,
};
pub use checklist::{toggle_checklist, try_toggle_checklist};
pub use classify::{LineClass, classify, indent_level};
pub use config::{Config, EditorConfig, LinksConfig, PrintConfig, WidgetConfig};
pub use error::{Error, Result};
pub use inline::tokenize;
pub use numbering::{format_number, ordinal_display};
pub use parser::{IndentCounters, parse, parse_with_limit};
pub use render::{
    Capabilities, EditorRenderer, PrintDocument, PrintRenderer, Renderer, ViewItem,
    WidgetRenderer, WidgetRow, render_source,
};

use serde::Serialize;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Which renderer a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Interactive editor/preview
    Editor,
    /// Compact widget, optionally overriding the configured line limit
    /// (`Some(0)` lifts the limit, as `line_limit = 0` does in the config)
    Widget { line_limit: Option<usize> },
    /// Paginated print layout
    Print,
}

/// Output of [`render`], one variant per [`RenderMode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    Editor(Vec<ViewItem>),
    Widget(Vec<WidgetRow>),
    Print(PrintDocument),
}

/// Render markdown to the view model of the requested mode.
pub fn render(markdown: &str, mode: RenderMode, config: &Config) -> Rendered {
    match mode {
        RenderMode::Editor => Rendered::Editor(render_editor(markdown, config)),
        RenderMode::Widget { line_limit: None } => {
            Rendered::Widget(render_widget(markdown, config))
        }
        RenderMode::Widget { line_limit } => {
            let renderer = WidgetRenderer::new(&config.widget).with_line_limit(line_limit);
            Rendered::Widget(render_source(&renderer, markdown))
        }
        RenderMode::Print => Rendered::Print(render_print(markdown, config)),
    }
}

/// Build the editor/preview view model.
pub fn render_editor(markdown: &str, config: &Config) -> Vec<ViewItem> {
    render_source(&EditorRenderer::new(&config.editor), markdown)
}

/// Build the compact widget view model under the configured line limit.
pub fn render_widget(markdown: &str, config: &Config) -> Vec<WidgetRow> {
    render_source(&WidgetRenderer::new(&config.widget), markdown)
}

/// Lay out markdown for print.
pub fn render_print(markdown: &str, config: &Config) -> PrintDocument {
    render_source(&PrintRenderer::new(&config.print), markdown)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let document = render_source(&PrintRenderer::new(&config.print), markdown);
    typst::print_to_typst(&document, config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Compile markdown to a Typst document.
fn compile_document(
    markdown: &str,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument> {
    let typst_content = markdown_to_typst_with_config(markdown, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{:?}", e)))
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    let doc = compile_document(markdown, config)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}
