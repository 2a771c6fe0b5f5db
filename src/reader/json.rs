//! Reader for JSON item dumps.
//!
//! Accepts either a bare array of items or an object with an `items` array.
//! Items that do not parse are skipped with a warning.

use super::{DocumentReader, ReadOutput};
use crate::error::{Error, Result};
use crate::model::RawItem;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reader for serialized [`RawItem`] sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonItemsReader;

impl JsonItemsReader {
    /// Create a new JSON reader.
    pub fn new() -> Self {
        Self
    }

    /// Parse items from a JSON string.
    pub fn parse_str(&self, json: &str) -> Result<Vec<RawItem>> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("JSON parse error: {}", e)))?;

        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(Error::InvalidInput(
                        "expected an `items` array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(Error::InvalidInput(
                    "expected an array of items".to_string(),
                ))
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<RawItem>(entry) {
                Ok(item) => items.push(item),
                Err(e) => log::warn!("skipping malformed item {}: {}", index, e),
            }
        }
        Ok(items)
    }
}

impl DocumentReader for JsonItemsReader {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<ReadOutput> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_start_matches('\u{FEFF}');
        Ok(ReadOutput::new(self.parse_str(text)?))
    }

    /// Relative image paths are resolved against the file's directory.
    fn read(&self, path: &Path) -> Result<ReadOutput> {
        let bytes = fs::read(path)?;
        let mut output = self.read_bytes(&bytes)?;
        if let Some(base) = path.parent() {
            for item in &mut output.items {
                if let RawItem::Image {
                    path: Some(image), ..
                } = item
                {
                    if image.is_relative() && !image.as_os_str().is_empty() {
                        *image = base.join(&*image);
                    }
                }
            }
        }
        Ok(output)
    }
}
