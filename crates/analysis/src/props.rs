//! Element properties: per-path field effects and state requirements.

use crate::{Field, FieldSet};
use adn_config::{Consistency, StateDependence, TrafficPath};
use serde::{Deserialize, Serialize};

/// What an element does to the traffic on one path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathEffects {
    /// Fields whose value influences the element's behavior.
    pub read: FieldSet,
    /// Fields the element overwrites.
    pub write: FieldSet,
    /// Fields the element observes without consuming, e.g. to emit a log line.
    pub record: FieldSet,
    /// The element may terminate the chain by replying with an error.
    pub drop: bool,
    /// The element never passes the message on.
    pub block: bool,
    /// The element emits a duplicate of (part of) the message.
    pub copy: bool,
    /// A drop depends on a random draw, e.g. fault injection.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub probabilistic: bool,
}

impl PathEffects {
    /// Returns `true` if the element may stop traffic on this path.
    pub fn drops_or_blocks(&self) -> bool {
        self.drop || self.block
    }

    /// Returns `true` if the element has no effect at all on this path.
    pub fn is_noop(&self) -> bool {
        self == &Self::default()
    }

    /// Adds synthetic trace obligations so that drop, block and copy behavior shows up in
    /// lineage tables like any other field.
    ///
    /// A recording element must observe the drop, block and copy history to produce a faithful
    /// log, so it records every trace field.
    pub fn add_trace_effects(&mut self) {
        use crate::field::{BLOCK_TRACE, COPY_TRACE, DROP_TRACE, TRACE_FIELDS};

        if !self.record.is_empty() {
            for field in TRACE_FIELDS {
                self.record.insert(Field::new(field));
            }
        }
        if self.drop {
            self.write.insert(Field::new(DROP_TRACE));
        }
        if self.block {
            self.write.insert(Field::new(BLOCK_TRACE));
        }
        if self.copy {
            self.write.insert(Field::new(COPY_TRACE));
        }
    }

    /// Absorbs the effects of an element that runs right after this one.
    pub fn merge(&mut self, other: &Self) {
        self.read.extend(&other.read);
        self.write.extend(&other.write);
        self.record.extend(&other.record);
        self.drop |= other.drop;
        self.block |= other.block;
        self.copy |= other.copy;
        self.probabilistic |= other.probabilistic;
    }
}

/// Effects of an element on both paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub request: PathEffects,
    pub response: PathEffects,
}

impl Effects {
    /// Returns the effects on `path`.
    pub fn get(&self, path: TrafficPath) -> &PathEffects {
        match path {
            TrafficPath::Request => &self.request,
            TrafficPath::Response => &self.response,
        }
    }

    /// Returns the effects on `path` mutably.
    pub fn get_mut(&mut self, path: TrafficPath) -> &mut PathEffects {
        match path {
            TrafficPath::Request => &mut self.request,
            TrafficPath::Response => &mut self.response,
        }
    }

    /// Merges both paths of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.request.merge(&other.request);
        self.response.merge(&other.response);
    }
}

/// State requirements of an element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementState {
    pub stateful: bool,
    pub consistency: Consistency,
    /// How concurrent updates are combined, e.g. `LWW`.
    pub combiner: String,
    pub state_dependence: StateDependence,
    /// Whether the state survives restarts, e.g. `ephemeral`.
    pub persistence: String,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            stateful: false,
            consistency: Consistency::Eventual,
            combiner: "LWW".into(),
            state_dependence: StateDependence::Independent,
            persistence: "ephemeral".into(),
        }
    }
}

impl ElementState {
    /// Returns `true` if the element needs strongly consistent state.
    pub fn is_strong(&self) -> bool {
        self.consistency.is_strong()
    }

    /// Absorbs the state requirements of a fused element. Strong consistency wins.
    pub fn merge(&mut self, other: &Self) {
        self.stateful |= other.stateful;
        if other.is_strong() && !self.is_strong() {
            self.consistency = other.consistency;
            self.state_dependence = other.state_dependence;
        }
    }
}

/// Everything the optimizer needs to know about one element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementProps {
    pub state: ElementState,
    #[serde(flatten)]
    pub effects: Effects,
}
