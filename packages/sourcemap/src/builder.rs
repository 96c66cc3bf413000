use std::collections::HashMap;

use serde_json::{Map, Value};
use sourcemap::{SourceMap as ExternalSourceMap, SourceMapBuilder as ExternalBuilder};

use crate::SourceMapError;

/// Builder for generating source maps while printing
///
/// Unlike the raw `sourcemap` builder this one deduplicates sources by
/// name, so a printed tree whose nodes come from several parsed files
/// can register each file once and refer to it by id.
pub struct SourceMapBuilder {
    builder: ExternalBuilder,
    sources: HashMap<String, u32>,
}

impl SourceMapBuilder {
    /// Create a new source map builder
    ///
    /// # Arguments
    /// * `file` - Name of the generated file the map describes
    pub fn new(file: Option<&str>) -> Self {
        Self {
            builder: ExternalBuilder::new(file),
            sources: HashMap::new(),
        }
    }

    /// Set the `sourceRoot` field of the generated map
    pub fn with_source_root(mut self, root: Option<&str>) -> Self {
        if root.is_some() {
            self.builder.set_source_root(root);
        }
        self
    }

    /// Register a source file, returning its id
    ///
    /// Registering the same name twice returns the existing id; contents
    /// are only recorded the first time.
    pub fn add_source(&mut self, name: &str, contents: Option<&str>) -> u32 {
        if let Some(id) = self.sources.get(name) {
            return *id;
        }

        let id = self.builder.add_source(name);
        if contents.is_some() {
            self.builder.set_source_contents(id, contents);
        }
        self.sources.insert(name.to_string(), id);
        id
    }

    /// Add a mapping from generated position to source position
    ///
    /// # Arguments
    /// * `gen_line` - Line in generated file (0-indexed)
    /// * `gen_col` - Column in generated file (0-indexed)
    /// * `source_id` - Id returned by [`SourceMapBuilder::add_source`]
    /// * `src_line` - Line in the original file (0-indexed)
    /// * `src_col` - Column in the original file (0-indexed)
    /// * `name` - Optional symbol name
    pub fn add_mapping(
        &mut self,
        gen_line: u32,
        gen_col: u32,
        source_id: u32,
        src_line: u32,
        src_col: u32,
        name: Option<&str>,
    ) {
        let name_id = name.map(|n| self.builder.add_name(n));

        self.builder.add_raw(
            gen_line,
            gen_col,
            src_line,
            src_col,
            Some(source_id),
            name_id,
            false, // is_range
        );
    }

    /// Build the final source map
    pub fn build(self) -> ExternalSourceMap {
        self.builder.into_sourcemap()
    }

    /// Convert to JSON string
    pub fn to_json(self) -> Result<String, SourceMapError> {
        let map = self.build();
        let mut buf = Vec::new();
        map.to_writer(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Encode a source map as a JSON object
pub fn to_json_object(map: &ExternalSourceMap) -> Result<Map<String, Value>, SourceMapError> {
    let mut buf = Vec::new();
    map.to_writer(&mut buf)?;
    match serde_json::from_slice(&buf)? {
        Value::Object(object) => Ok(object),
        _ => Err(SourceMapError::NotAnObject),
    }
}

/// Decode a source map from a JSON object
pub fn from_json_object(object: &Map<String, Value>) -> Result<ExternalSourceMap, SourceMapError> {
    let buf = serde_json::to_vec(object)?;
    Ok(ExternalSourceMap::from_slice(&buf)?)
}

/// Decode a source map from an arbitrary JSON value, rejecting non-objects
pub fn from_json_value(value: &Value) -> Result<ExternalSourceMap, SourceMapError> {
    match value {
        Value::Object(object) => from_json_object(object),
        _ => Err(SourceMapError::NotAnObject),
    }
}
