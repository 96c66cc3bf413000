//! Printer configuration
//!
//! [`PartialOptions`] is what callers write (every field optional, JSON
//! friendly, unknown keys rejected). [`normalize`] turns it into the
//! complete [`Options`] record the printer works with. Per-call flags
//! that only matter while walking the tree live in [`PrintOptions`].

use std::sync::Arc;

use reprint_common::{ReprintError, ReprintResult};
use reprint_sourcemap::SourceMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Keep the quote a string literal was written with
    #[default]
    Auto,
    Single,
    Double,
}

/// Complete, validated configuration
#[derive(Debug, Clone)]
pub struct Options {
    /// Columns per indentation level
    pub tab_width: usize,
    pub use_tabs: bool,
    /// Keep original blank lines and comment spacing where possible
    pub reuse_whitespace: bool,
    /// Every line break in the output is written with this terminator,
    /// including breaks copied from the original text; a CRLF file
    /// printed with the default comes back with LF endings
    pub line_terminator: String,
    /// Call arguments break onto separate lines past this column
    pub wrap_column: usize,
    pub quote: QuoteStyle,
    /// Add a trailing comma after the last argument of a broken call
    pub trailing_comma: bool,
    /// Omit the parentheses the printed root node would otherwise need
    pub avoid_root_parens: bool,
    pub source_file_name: Option<String>,
    /// Generated file name recorded in the output map; no map without it
    pub source_map_name: Option<String>,
    pub source_root: Option<String>,
    /// Map of the parsed input, composed into the output map
    pub input_source_map: Option<Arc<SourceMap>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: 4,
            use_tabs: false,
            reuse_whitespace: true,
            line_terminator: "\n".to_string(),
            wrap_column: 74,
            quote: QuoteStyle::Auto,
            trailing_comma: false,
            avoid_root_parens: false,
            source_file_name: None,
            source_map_name: None,
            source_root: None,
            input_source_map: None,
        }
    }
}

/// User supplied options; anything left out takes its default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tabs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_terminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comma: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_root_parens: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_source_map: Option<Value>,
}

impl PartialOptions {
    /// Read options from a JSON value, rejecting unknown option names
    pub fn from_json(value: Value) -> ReprintResult<Self> {
        serde_json::from_value(value).map_err(|e| ReprintError::InvalidOptions(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> ReprintResult<Self> {
        serde_json::from_str(json).map_err(|e| ReprintError::InvalidOptions(e.to_string()))
    }

    /// Overlay `overrides` on top of `self`; fields set in `overrides` win
    pub fn merge(self, overrides: PartialOptions) -> PartialOptions {
        PartialOptions {
            tab_width: overrides.tab_width.or(self.tab_width),
            use_tabs: overrides.use_tabs.or(self.use_tabs),
            reuse_whitespace: overrides.reuse_whitespace.or(self.reuse_whitespace),
            line_terminator: overrides.line_terminator.or(self.line_terminator),
            wrap_column: overrides.wrap_column.or(self.wrap_column),
            quote: overrides.quote.or(self.quote),
            trailing_comma: overrides.trailing_comma.or(self.trailing_comma),
            avoid_root_parens: overrides.avoid_root_parens.or(self.avoid_root_parens),
            source_file_name: overrides.source_file_name.or(self.source_file_name),
            source_map_name: overrides.source_map_name.or(self.source_map_name),
            source_root: overrides.source_root.or(self.source_root),
            input_source_map: overrides.input_source_map.or(self.input_source_map),
        }
    }
}

/// Build the complete configuration from user options
pub fn normalize(partial: &PartialOptions) -> ReprintResult<Options> {
    Options::default().with_partial(partial)
}

impl Options {
    /// Copy of `self` with every field set in `partial` replaced
    pub fn with_partial(&self, partial: &PartialOptions) -> ReprintResult<Options> {
        let mut options = self.clone();

        if let Some(tab_width) = partial.tab_width {
            if tab_width == 0 {
                return Err(ReprintError::InvalidOptions("tabWidth must be at least 1".into()));
            }
            options.tab_width = tab_width;
        }
        if let Some(line_terminator) = &partial.line_terminator {
            if !matches!(line_terminator.as_str(), "\n" | "\r\n" | "\r") {
                return Err(ReprintError::InvalidOptions(format!(
                    "unsupported lineTerminator {:?}",
                    line_terminator
                )));
            }
            options.line_terminator = line_terminator.clone();
        }
        if let Some(wrap_column) = partial.wrap_column {
            options.wrap_column = wrap_column;
        }
        if let Some(input_source_map) = &partial.input_source_map {
            let map = reprint_sourcemap::from_json_value(input_source_map)?;
            options.input_source_map = Some(Arc::new(map));
        }

        options.use_tabs = partial.use_tabs.unwrap_or(options.use_tabs);
        options.reuse_whitespace = partial.reuse_whitespace.unwrap_or(options.reuse_whitespace);
        options.quote = partial.quote.unwrap_or(options.quote);
        options.trailing_comma = partial.trailing_comma.unwrap_or(options.trailing_comma);
        options.avoid_root_parens = partial.avoid_root_parens.unwrap_or(options.avoid_root_parens);
        options.source_file_name = partial.source_file_name.clone().or(options.source_file_name);
        options.source_map_name = partial.source_map_name.clone().or(options.source_map_name);
        options.source_root = partial.source_root.clone().or(options.source_root);

        Ok(options)
    }

    /// Configuration for one generic-format call: `self` plus the call flags
    pub fn merged(&self, call: PrintOptions) -> Options {
        Options {
            avoid_root_parens: call.avoid_root_parens,
            ..self.clone()
        }
    }

    /// Whitespace for `columns` of indentation
    pub fn indentation(&self, columns: usize) -> String {
        if self.use_tabs {
            let tab_width = self.tab_width.max(1);
            let mut indent = "\t".repeat(columns / tab_width);
            indent.push_str(&" ".repeat(columns % tab_width));
            indent
        } else {
            " ".repeat(columns)
        }
    }
}

/// Flags that travel with a single print call through the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub include_comments: bool,
    pub avoid_root_parens: bool,
}

impl PrintOptions {
    /// Flags for the top of a render: comments on, root parens kept
    pub fn root() -> Self {
        Self {
            include_comments: true,
            avoid_root_parens: false,
        }
    }

    pub fn with_overrides(self, overrides: PrintOverrides) -> Self {
        Self {
            include_comments: overrides.include_comments.unwrap_or(self.include_comments),
            avoid_root_parens: overrides.avoid_root_parens.unwrap_or(self.avoid_root_parens),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOverrides {
    pub include_comments: Option<bool>,
    pub avoid_root_parens: Option<bool>,
}
