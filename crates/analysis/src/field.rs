//! Message fields and field sets.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Synthetic field written by every dropping element.
pub const DROP_TRACE: &str = "droptrace";
/// Synthetic field written by every blocking element.
pub const BLOCK_TRACE: &str = "blocktrace";
/// Synthetic field written by every copying element.
pub const COPY_TRACE: &str = "copytrace";
/// All synthetic trace fields.
pub const TRACE_FIELDS: [&str; 3] = [DROP_TRACE, BLOCK_TRACE, COPY_TRACE];

/// The wildcard spelling used in property files.
const WILDCARD: &str = "*";

/// A named piece of message data or a synthetic trace field.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(Arc<str>);

impl Field {
    /// Creates a new field.
    pub fn new(name: &str) -> Self {
        Self(name.into())
    }

    /// Returns the field name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of fields, or every field the chain knows about.
///
/// Insertion order is kept so that lineage tables are built deterministically. Duplicates are
/// representable because property files are hand-written; [`FieldSet::find_duplicate`] reports
/// them and the lineage builder rejects them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldSetRepr", into = "FieldSetRepr")]
pub enum FieldSet {
    /// `*`: every known field.
    All,
    /// An explicit list of fields.
    Fields(Vec<Field>),
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::Fields(Vec::new())
    }
}

impl FieldSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a list of field names, keeping duplicates.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::Fields(names.into_iter().map(Field::new).collect())
    }

    /// Returns `true` if this is the wildcard.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns `true` if the set holds no field and is not the wildcard.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Fields(fields) => fields.is_empty(),
        }
    }

    /// Returns the explicit fields. The wildcard has none.
    pub fn fields(&self) -> &[Field] {
        match self {
            Self::Fields(fields) => fields,
            Self::All => &[],
        }
    }

    /// Returns `true` if `field` is in the set. The wildcard contains everything.
    pub fn contains(&self, field: &Field) -> bool {
        self.is_all() || self.fields().contains(field)
    }

    /// Adds `field` unless it is already present. A no-op on the wildcard.
    pub fn insert(&mut self, field: Field) {
        match self {
            Self::All => {}
            Self::Fields(fields) => {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }
    }

    /// Adds every field of `other`. The wildcard absorbs.
    pub fn extend(&mut self, other: &Self) {
        match other {
            Self::All => *self = Self::All,
            Self::Fields(fields) => {
                for field in fields {
                    self.insert(field.clone());
                }
            }
        }
    }

    /// Resolves the set against the chain's known fields.
    pub fn expand<'a>(&'a self, known: &'a [Field]) -> &'a [Field] {
        if self.is_all() { known } else { self.fields() }
    }

    /// Returns the first field that appears more than once, if any.
    pub fn find_duplicate(&self) -> Option<&Field> {
        let mut seen = FxHashSet::default();
        self.fields().iter().find(|&field| !seen.insert(field))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

/// Serialized form: `"*"` or a list of names.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FieldSetRepr {
    Wildcard(String),
    List(Vec<Field>),
}

impl TryFrom<FieldSetRepr> for FieldSet {
    type Error = String;

    fn try_from(repr: FieldSetRepr) -> Result<Self, Self::Error> {
        match repr {
            FieldSetRepr::Wildcard(s) if s == WILDCARD => Ok(Self::All),
            FieldSetRepr::Wildcard(s) => {
                Err(format!("expected a list of fields or \"{WILDCARD}\", found \"{s}\""))
            }
            FieldSetRepr::List(fields) => Ok(Self::Fields(fields)),
        }
    }
}

impl From<FieldSet> for FieldSetRepr {
    fn from(set: FieldSet) -> Self {
        match set {
            FieldSet::All => Self::Wildcard(WILDCARD.into()),
            FieldSet::Fields(fields) => Self::List(fields),
        }
    }
}
