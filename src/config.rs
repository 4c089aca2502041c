use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Rendering settings, passed explicitly into every render call.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
    pub widget: WidgetConfig,
    pub print: PrintConfig,
    pub links: LinksConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Emit spacer items for blank source lines
    pub preserve_blank_lines: bool,
    /// Emit placeholder items for image-only lines
    pub show_images: bool,
    pub indent_width: f32,
    pub checkbox_size: f32,
    pub bullet_size: f32,
    pub heading_sizes: [f32; 6],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preserve_blank_lines: true,
            show_images: true,
            indent_width: 20.0,
            checkbox_size: 18.0,
            bullet_size: 6.0,
            heading_sizes: [28.0, 24.0, 20.0, 18.0, 16.0, 15.0],
        }
    }
}

impl EditorConfig {
    /// Font size for a heading level, clamped to 1..=6.
    pub fn heading_size(&self, level: u8) -> f32 {
        self.heading_sizes[usize::from(level.clamp(1, 6)) - 1]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    /// Raw source lines considered; 0 means no limit
    pub line_limit: usize,
    /// Display columns available per row
    pub max_columns: usize,
    /// Leave checked checklist items out of the widget
    pub hide_completed: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            line_limit: 12,
            max_columns: 40,
            hide_completed: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrintConfig {
    /// Number level-1 and level-2 headings as chapters
    pub chapter_numbers: bool,
    pub lines_per_page: usize,
    pub chars_per_line: usize,
    pub page_numbers: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            chapter_numbers: true,
            lines_per_page: 48,
            chars_per_line: 80,
            page_numbers: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#1a4f8b".to_string(),
            underline: true,
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("default_config.toml is validated by build.rs")
    }

    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
