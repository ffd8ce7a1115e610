//! Writer lineage.
//!
//! For every read in a chain, the lineage records which upstream writers the read observes. Two
//! chains whose reads observe the same writers behave the same, whatever the order of elements
//! that do not interact.

use crate::{Element, OptimizeError, Result};
use adn_analysis::{Field, FieldSet, field::TRACE_FIELDS};
use adn_config::TrafficPath;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::{hash::BuildHasherDefault, sync::Arc};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Something that last wrote a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Writer {
    /// The value the message entered the chain with.
    #[display("INPUT")]
    Input,
    #[display("{_0}")]
    Element(Arc<str>),
}

/// Something that observes a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Reader {
    #[display("{_0}")]
    Element(Arc<str>),
    /// The message as it leaves the chain.
    #[display("OUTPUT")]
    Output,
}

/// The writers a read observes, oldest first.
pub type Writers = Vec<Writer>;

/// Lineage tables of one chain on one path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lineage {
    /// Writers observed by every read, and by the chain output.
    pub read: FxIndexMap<(Reader, Field), Writers>,
    /// Writers observed by every record. Only compared at the strong level.
    pub record: FxIndexMap<(Reader, Field), Writers>,
}

impl Lineage {
    /// Returns the writers `reader` observes on `field`.
    pub fn read(&self, reader: &Reader, field: &str) -> Option<&Writers> {
        self.read.get(&(reader.clone(), Field::new(field)))
    }

    /// Returns the writers `reader` records on `field`.
    pub fn record(&self, reader: &Reader, field: &str) -> Option<&Writers> {
        self.record.get(&(reader.clone(), Field::new(field)))
    }
}

/// Returns every field the chain touches on `path`, trace fields first.
pub fn known_fields(chain: &[Element], path: TrafficPath) -> Vec<Field> {
    let mut known = FieldSet::new();
    for name in TRACE_FIELDS {
        known.insert(Field::new(name));
    }
    for element in chain {
        let effects = element.effects(path);
        for set in [&effects.read, &effects.write, &effects.record] {
            for field in set.fields() {
                known.insert(field.clone());
            }
        }
    }
    known.fields().to_vec()
}

/// Builds the lineage tables of `chain` on `path`.
///
/// Every known field starts out written by [`Writer::Input`]. Walking the chain in order, each
/// read snapshots the current writers of its field, and each write appends the element. A write
/// by an element whose partner is among the current writers cancels the partner instead.
/// Finally the writers of every field are recorded for [`Reader::Output`].
pub fn gen_dependency(chain: &[Element], path: TrafficPath) -> Result<Lineage> {
    let known = known_fields(chain, path);
    let mut writers: FxIndexMap<Field, Writers> =
        known.iter().map(|field| (field.clone(), vec![Writer::Input])).collect();
    let mut lineage = Lineage::default();

    for element in chain {
        let effects = element.effects(path);
        let name: Arc<str> = element.lib_name().into();
        for (set, fields) in
            [("read", &effects.read), ("write", &effects.write), ("record", &effects.record)]
        {
            if let Some(field) = fields.find_duplicate() {
                return Err(OptimizeError::DuplicateField {
                    element: name.to_string(),
                    path,
                    set,
                    field: field.to_string(),
                });
            }
        }

        let reader = Reader::Element(name.clone());
        for field in effects.read.expand(&known) {
            let seen = writers[field].clone();
            lineage.read.insert((reader.clone(), field.clone()), seen);
        }
        for field in effects.record.expand(&known) {
            let seen = writers[field].clone();
            lineage.record.insert((reader.clone(), field.clone()), seen);
        }
        for field in effects.write.expand(&known) {
            let Some(list) = writers.get_mut(field) else { continue };
            let partner = element.partner.as_deref().and_then(|partner| {
                list.iter().position(|w| matches!(w, Writer::Element(n) if **n == *partner))
            });
            match partner {
                Some(pos) => {
                    trace!(element = %name, %field, "partner write canceled");
                    list.remove(pos);
                }
                None => list.push(Writer::Element(name.clone())),
            }
        }
    }

    for (field, list) in writers {
        lineage.read.insert((Reader::Output, field), list);
    }
    Ok(lineage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_analysis::PathEffects;

    const PATH: TrafficPath = TrafficPath::Request;

    fn elem(name: &str, read: &[&str], write: &[&str]) -> Element {
        Element::new(name).with_effects(
            PATH,
            PathEffects {
                read: FieldSet::from_names(read.iter().copied()),
                write: FieldSet::from_names(write.iter().copied()),
                ..Default::default()
            },
        )
    }

    fn writers(names: &[&str]) -> Writers {
        names
            .iter()
            .map(|&n| if n == "INPUT" { Writer::Input } else { Writer::Element(n.into()) })
            .collect()
    }

    fn reader(name: &str) -> Reader {
        Reader::Element(name.into())
    }

    #[test]
    fn read_after_write() {
        let chain = [elem("A", &[], &["f1"]), elem("B", &["f1"], &[])];
        let lineage = gen_dependency(&chain, PATH).unwrap();
        assert_eq!(lineage.read(&reader("B"), "f1"), Some(&writers(&["INPUT", "A"])));
        assert_eq!(lineage.read(&Reader::Output, "f1"), Some(&writers(&["INPUT", "A"])));
        assert_eq!(lineage.read(&Reader::Output, "droptrace"), Some(&writers(&["INPUT"])));

        let swapped = [chain[1].clone(), chain[0].clone()];
        let lineage = gen_dependency(&swapped, PATH).unwrap();
        assert_eq!(lineage.read(&reader("B"), "f1"), Some(&writers(&["INPUT"])));
    }

    #[test]
    fn partner_cancels_write() {
        let chain =
            [elem("A", &[], &["f1"]), elem("P", &["f1"], &["f1"]).with_partner("A")];
        let lineage = gen_dependency(&chain, PATH).unwrap();
        assert_eq!(lineage.read(&reader("P"), "f1"), Some(&writers(&["INPUT", "A"])));
        // Only the original input is left; neither A nor P is a writer.
        assert_eq!(lineage.read(&Reader::Output, "f1"), Some(&writers(&["INPUT"])));
    }

    #[test]
    fn wildcards_expand_to_known_fields() {
        let mut all = elem("W", &[], &[]);
        all.effects.request.write = FieldSet::All;
        let chain = [elem("A", &["x"], &[]), all, elem("B", &["x", "y"], &[])];
        let lineage = gen_dependency(&chain, PATH).unwrap();
        assert_eq!(lineage.read(&reader("B"), "y"), Some(&writers(&["INPUT", "W"])));
        assert_eq!(lineage.read(&Reader::Output, "copytrace"), Some(&writers(&["INPUT", "W"])));
    }

    #[test]
    fn records_are_separate() {
        let mut log = elem("log", &[], &[]);
        log.effects.request.record = FieldSet::from_names(["user"]);
        let chain = [elem("A", &[], &["user"]), log];
        let lineage = gen_dependency(&chain, PATH).unwrap();
        assert_eq!(lineage.record(&reader("log"), "user"), Some(&writers(&["INPUT", "A"])));
        assert_eq!(lineage.read(&reader("log"), "user"), None);
    }

    #[test]
    fn duplicate_fields_are_fatal() {
        let chain = [elem("A", &["x", "x"], &[])];
        let err = gen_dependency(&chain, PATH).unwrap_err();
        assert!(
            matches!(&err, OptimizeError::DuplicateField { element, set: "read", field, .. }
                if element == "A" && field == "x"),
            "{err}"
        );
    }
}
