//! Chain description files.
//!
//! A chain file lists the elements of one client/server edge in order, with the network marker
//! as an element of its own:
//!
//! ```yaml
//! chain:
//!   - name: logging
//!     site: C
//!   - name: network
//!     site: N
//!   - name: [acl, fault]
//!     properties:
//!       request: { read: [user], drop: true }
//! ```
//!
//! Elements without inline `properties` are looked up in the property directory.

use crate::{CliError, Result};
use adn_analysis::{Effects, ElementState, load_properties};
use adn_config::{ChainFormat, Site};
use adn_graph::Element;
use serde::Deserialize;
use std::path::Path;

/// A parsed chain file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainFile {
    pub chain: Vec<ElementSpec>,
}

/// One element of a chain file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub name: Names,
    #[serde(default)]
    pub partner: Option<String>,
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub state: ElementState,
    #[serde(default)]
    pub properties: Option<Effects>,
}

/// A single library element name, or the names of an already fused element.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl ElementSpec {
    /// Builds the element, reading its properties from `property_dir` unless given inline.
    pub fn into_element(self, property_dir: Option<&Path>) -> Result<Element> {
        let names = self.name.into_vec();
        if names.is_empty() || names.iter().any(String::is_empty) {
            return Err(CliError::InvalidChain("element names must not be empty".into()));
        }
        let effects = match (self.properties, property_dir) {
            (Some(effects), _) => effects,
            (None, _) if self.site.is_network() => Effects::default(),
            (None, Some(dir)) => load_properties(dir, &names)?,
            (None, None) => {
                return Err(CliError::MissingProperties { element: names.join("+") });
            }
        };
        let mut element = Element::from_names(names).with_site(self.site).with_state(self.state);
        element.partner = self.partner;
        element.effects = effects;
        Ok(element)
    }
}

/// Parses a chain file, in YAML or JSON depending on its extension.
pub fn read_chain_file(path: &Path) -> Result<ChainFile> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CliError::Read(path.to_path_buf(), e))?;
    match ChainFormat::from_path(path) {
        ChainFormat::Yaml => {
            serde_yaml::from_str(&contents).map_err(|e| CliError::Yaml(path.to_path_buf(), e))
        }
        ChainFormat::Json => {
            serde_json::from_str(&contents).map_err(|e| CliError::Json(path.to_path_buf(), e))
        }
    }
}

/// Loads the chain described by `path`.
pub fn load_chain(path: &Path, property_dir: Option<&Path>) -> Result<Vec<Element>> {
    let file = read_chain_file(path)?;
    let chain = file
        .chain
        .into_iter()
        .map(|spec| spec.into_element(property_dir))
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), len = chain.len(), "loaded chain");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_config::TrafficPath;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn inline_and_looked_up() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "acl.yaml", "request:\n  read: [user]\n  drop: true\nresponse:\n");
        let path = write(
            dir.path(),
            "chain.yaml",
            r#"
chain:
  - name: logging
    site: C
    properties:
      request: { record: "*" }
  - name: network
    site: N
  - name: acl
    partner: logging
"#,
        );

        let chain = load_chain(&path, Some(dir.path())).unwrap();
        assert_eq!(chain.len(), 3);
        assert!(chain[0].effects(TrafficPath::Request).record.is_all());
        assert!(chain[1].is_network());
        assert_eq!(chain[2].site, Site::DontCare);
        assert_eq!(chain[2].partner.as_deref(), Some("logging"));
        assert!(chain[2].effects(TrafficPath::Request).drop);
    }

    #[test]
    fn json_and_fused_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "chain.json",
            r#"{ "chain": [{ "name": ["a", "b"], "site": "S", "properties": {} }] }"#,
        );
        let chain = load_chain(&path, None).unwrap();
        assert_eq!(chain[0].lib_name(), "a+b");
        assert_eq!(chain[0].site, Site::Server);
    }

    #[test]
    fn errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "chain.yaml", "chain:\n  - name: acl\n");
        let err = load_chain(&path, None).unwrap_err();
        assert!(matches!(&err, CliError::MissingProperties { element } if element == "acl"));

        let err = load_chain(&path, Some(dir.path())).unwrap_err();
        assert!(matches!(err, CliError::Analysis(_)), "{err}");

        let path = write(dir.path(), "bad.yaml", "chain:\n  - name: acl\n    color: red\n");
        assert!(matches!(load_chain(&path, None), Err(CliError::Yaml(..))));

        let path = write(dir.path(), "empty.yaml", "chain:\n  - name: []\n");
        assert!(matches!(load_chain(&path, None), Err(CliError::InvalidChain(_))));
    }
}
