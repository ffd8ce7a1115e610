//! The element model.

use crate::{OptimizeError, Result};
use adn_analysis::{
    Effects, ElementProps, ElementState, PathEffects, analyze_element, ir::Program,
};
use adn_config::{AnalysisConfig, Site, TrafficPath};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;

/// One configured chain stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Library element names. More than one after fusion.
    #[serde(rename = "name")]
    pub names: SmallVec<[String; 1]>,
    /// The element whose write obligations this one cancels, e.g. the encryption matching a
    /// decryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub state: ElementState,
    #[serde(default, rename = "properties")]
    pub effects: Effects,
}

impl Element {
    /// Creates a site-agnostic element without effects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: smallvec![name.into()],
            partner: None,
            site: Site::DontCare,
            state: ElementState::default(),
            effects: Effects::default(),
        }
    }

    /// Creates a site-agnostic element carrying several library names, as if already fused.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self { names: names.into_iter().map(Into::into).collect(), ..Self::new("") }
    }

    /// Creates the client/server boundary marker.
    pub fn network() -> Self {
        Self::new("network").with_site(Site::Network)
    }

    /// Creates an element whose properties are inferred from its IR.
    pub fn from_program(program: &Program, config: &AnalysisConfig) -> Result<Self> {
        let ElementProps { state, effects } = analyze_element(program, config)?;
        Ok(Self { state, effects, ..Self::new(program.name.as_str()) })
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.site = site;
        self
    }

    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    pub fn with_state(mut self, state: ElementState) -> Self {
        self.state = state;
        self
    }

    /// Sets the effects on `path`.
    pub fn with_effects(mut self, path: TrafficPath, effects: PathEffects) -> Self {
        *self.effects.get_mut(path) = effects;
        self
    }

    /// Returns the identity used in lineage tables: the library names joined by `+`.
    pub fn lib_name(&self) -> String {
        self.names.join("+")
    }

    /// Returns the effects on `path`.
    pub fn effects(&self, path: TrafficPath) -> &PathEffects {
        self.effects.get(path)
    }

    /// Returns `true` for the client/server boundary marker.
    pub fn is_network(&self) -> bool {
        self.site.is_network()
    }

    /// Returns `true` if the element needs strongly consistent state.
    pub fn is_strong(&self) -> bool {
        self.state.is_strong()
    }

    /// Absorbs `other`, which runs right after `self` on the same side.
    ///
    /// The fused element carries both identities and the union of both effects. It keeps the
    /// stricter state requirement and the more specific site.
    pub fn fuse(&mut self, other: Self) {
        self.names.extend(other.names);
        if self.partner.is_none() {
            self.partner = other.partner;
        }
        if self.site.is_dont_care() {
            self.site = other.site;
        }
        self.effects.merge(&other.effects);
        self.state.merge(&other.state);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.lib_name(), self.site)
    }
}

/// Formats a chain as `a@client -> network@network -> b@server`.
pub fn display_chain(chain: &[Element]) -> DisplayChain<'_> {
    DisplayChain(chain)
}

/// See [`display_chain`].
#[derive(Clone, Copy, Debug)]
pub struct DisplayChain<'a>(&'a [Element]);

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format(" -> "))
    }
}

/// Returns the index of the network marker, erroring unless there is exactly one.
pub fn network_position(chain: &[Element]) -> Result<usize> {
    let mut positions = chain.iter().positions(Element::is_network);
    let Some(first) = positions.next() else {
        return Err(OptimizeError::MissingNetwork);
    };
    let extra = positions.count();
    if extra > 0 {
        return Err(OptimizeError::MultipleNetwork { count: extra + 1 });
    }
    Ok(first)
}
