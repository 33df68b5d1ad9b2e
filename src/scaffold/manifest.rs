//! `composer.json` rewriting.
//!
//! The template ships with its own namespace; a new package gets
//! `"autoload": {"<Namespace>\\": "src"}` instead. Composer treats `[]` and
//! `{}` differently for some sections, so those are forced to objects.

use crate::error::ScaffoldError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Sections that must always be present and serialize as JSON objects.
pub const OBJECT_SECTIONS: [&str; 4] = ["require", "suggest", "autoload-dev", "extra"];

pub const SOURCE_DIR: &str = "src";

/// Read, edit and write back the manifest at `path`.
pub fn rewrite(path: &Path, namespace: &str) -> Result<(), ScaffoldError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ScaffoldError::Manifest(format!("{}: {}", path.display(), e)))?;

    let mut root = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(ScaffoldError::Manifest(format!(
                "{}: top level is not a JSON object",
                path.display()
            )));
        }
        Err(e) => {
            return Err(ScaffoldError::Manifest(format!("{}: {}", path.display(), e)));
        }
    };

    apply(&mut root, namespace);

    let rendered = render(&Value::Object(root))
        .map_err(|e| ScaffoldError::Manifest(format!("{}: {}", path.display(), e)))?;
    fs::write(path, rendered)
        .map_err(|e| ScaffoldError::Manifest(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), namespace, "manifest rewritten");
    Ok(())
}

/// Point autoload at `namespace` and normalize the object-only sections.
pub fn apply(root: &mut Map<String, Value>, namespace: &str) {
    let mut autoload = Map::new();
    autoload.insert(
        format!("{}\\", namespace),
        Value::String(SOURCE_DIR.to_string()),
    );
    root.insert("autoload".to_string(), Value::Object(autoload));

    for key in OBJECT_SECTIONS {
        let empty = match root.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        };
        if empty {
            root.insert(key.to_string(), Value::Object(Map::new()));
        }
    }
}

/// Four-space indented JSON with a trailing newline. Slashes stay unescaped.
pub fn render(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
