//! Pre-vetted element properties.
//!
//! Elements that ship with hand-audited properties skip the analyzers. Their effects live in one
//! file per library element, `<name>.yaml`, `<name>.yml` or `<name>.json`:
//!
//! ```yaml
//! request:
//!   read: [user]
//!   drop: true
//! response:
//!   write: "*"
//! ```

use crate::{AnalysisError, Result, props::Effects};
use adn_config::{ChainFormat, TrafficPath};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Loads and merges the effects of the library elements `names` from `dir`.
///
/// When more than one name is given, the first file to set a key wins, except for field lists
/// which are concatenated without repeats. `"*"` absorbs any list it meets.
pub fn load_properties<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<Effects> {
    let mut merged = [Map::new(), Map::new()];
    for name in names {
        let name = name.as_ref();
        let path = find_property_file(dir, name)?;
        let value = read_property_file(&path)?;
        debug!(element = name, path = %path.display(), "loaded properties");
        merge_properties(&mut merged, value, name)?;
    }
    let [request, response] = merged;
    let mut root = Map::new();
    root.insert(TrafficPath::Request.to_str().into(), Value::Object(request));
    root.insert(TrafficPath::Response.to_str().into(), Value::Object(response));
    serde_json::from_value(Value::Object(root)).map_err(|e| AnalysisError::InvalidProperties {
        element: names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("+"),
        reason: e.to_string(),
    })
}

/// Parses one property file.
pub fn read_property_file(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::ReadProperties(path.to_path_buf(), e))?;
    match ChainFormat::from_path(path) {
        ChainFormat::Yaml => serde_yaml::from_str(&contents)
            .map_err(|e| AnalysisError::ParseYaml(path.to_path_buf(), e)),
        ChainFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| AnalysisError::ParseJson(path.to_path_buf(), e)),
    }
}

fn find_property_file(dir: &Path, name: &str) -> Result<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            let path = dir.join(format!("{name}.yaml"));
            AnalysisError::ReadProperties(path, std::io::ErrorKind::NotFound.into())
        })
}

fn merge_properties(merged: &mut [Map<String, Value>; 2], value: Value, name: &str) -> Result<()> {
    let Value::Object(mut root) = value else {
        return Err(AnalysisError::InvalidProperties {
            element: name.into(),
            reason: "expected a mapping with `request` and `response` keys".into(),
        });
    };
    for (dst, path) in merged.iter_mut().zip([TrafficPath::Request, TrafficPath::Response]) {
        let key = path.to_str();
        let props = match root.remove(key) {
            None | Some(Value::Null) => continue,
            Some(Value::Object(props)) => props,
            Some(other) => {
                return Err(AnalysisError::InvalidProperties {
                    element: name.into(),
                    reason: format!("`{key}` must be a mapping, found {other}"),
                });
            }
        };
        for (prop, value) in props {
            let Some(slot) = dst.get_mut(&prop) else {
                dst.insert(prop, value);
                continue;
            };
            match (slot, value) {
                (Value::Array(fields), Value::Array(more)) => {
                    for field in more {
                        if !fields.contains(&field) {
                            fields.push(field);
                        }
                    }
                }
                (slot, wildcard @ Value::String(_)) if slot.is_array() => *slot = wildcard,
                // Scalars keep the first value.
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSet;

    fn write(dir: &Path, file: &str, contents: &str) {
        std::fs::write(dir.join(file), contents).unwrap();
    }

    #[test]
    fn single_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acl.yaml", "request:\n  read: [user]\n  drop: true\nresponse:\n");
        let effects = load_properties(dir.path(), &["acl"]).unwrap();
        assert_eq!(effects.request.read, FieldSet::from_names(["user"]));
        assert!(effects.request.drop);
        assert!(effects.response.is_noop());
    }

    #[test]
    fn merge_multiple_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yml", "request:\n  read: [x, y]\n  drop: false\n");
        write(
            dir.path(),
            "b.json",
            r#"{ "request": { "read": ["y", "z"], "drop": true, "write": ["z"] }, "response": { "write": "*" } }"#,
        );
        let effects = load_properties(dir.path(), &["a", "b"]).unwrap();
        assert_eq!(effects.request.read, FieldSet::from_names(["x", "y", "z"]));
        assert_eq!(effects.request.write, FieldSet::from_names(["z"]));
        // First value wins for scalars.
        assert!(!effects.request.drop);
        assert!(effects.response.write.is_all());
    }

    #[test]
    fn wildcard_absorbs_lists() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", "request:\n  write: [x]\n");
        write(dir.path(), "b.yaml", "request:\n  write: \"*\"\n");
        write(dir.path(), "c.yaml", "request:\n  write: [y]\n");
        let effects = load_properties(dir.path(), &["a", "b", "c"]).unwrap();
        assert!(effects.request.write.is_all());
    }

    #[test]
    fn errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_properties(dir.path(), &["missing"]).unwrap_err();
        assert!(matches!(err, AnalysisError::ReadProperties(..)), "{err}");

        write(dir.path(), "bad.yaml", "request: [1, 2");
        let err = load_properties(dir.path(), &["bad"]).unwrap_err();
        assert!(matches!(err, AnalysisError::ParseYaml(..)), "{err}");

        write(dir.path(), "typo.json", r#"{ "request": { "read": "user" } }"#);
        let err = load_properties(dir.path(), &["typo"]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidProperties { .. }), "{err}");
    }
}
