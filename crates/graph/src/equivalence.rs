//! Equivalence of chain transformations.

use crate::{Element, Lineage, Result, gen_dependency};
use adn_config::{EquivalenceLevel, Site, TrafficPath};

/// Returns `true` if every client element runs before the network marker and every server
/// element after it.
///
/// Without a network marker every element counts as client side.
pub fn position_valid(chain: &[Element]) -> bool {
    let mut server_side = false;
    for element in chain {
        match element.site {
            Site::Network => server_side = true,
            Site::Server if !server_side => return false,
            Site::Client if server_side => return false,
            Site::Client | Site::Server | Site::DontCare => {}
        }
    }
    true
}

/// Adds the synthetic trace effects of every element on `path`.
///
/// Must run once before lineages are compared, so that moving a drop, block or copy across a
/// recording element is visible.
pub fn init_dependency(chain: &mut [Element], path: TrafficPath) {
    for element in chain {
        element.effects.get_mut(path).add_trace_effects();
    }
}

/// Returns `true` if `new_chain` behaves like `chain` on `path` at `level`.
pub fn equivalent(
    chain: &[Element],
    new_chain: &[Element],
    path: TrafficPath,
    level: EquivalenceLevel,
) -> Result<bool> {
    Oracle::new(chain, path, level)?.accepts(new_chain)
}

/// Decides equivalence against a fixed reference chain.
///
/// The reference lineage is built once and reused for every candidate.
#[derive(Clone, Debug)]
pub struct Oracle {
    path: TrafficPath,
    level: EquivalenceLevel,
    /// `None` at [`EquivalenceLevel::Ignore`], where lineages are never compared.
    reference: Option<Lineage>,
}

impl Oracle {
    /// Creates an oracle comparing candidates against `chain`.
    pub fn new(chain: &[Element], path: TrafficPath, level: EquivalenceLevel) -> Result<Self> {
        let reference = match level {
            EquivalenceLevel::Ignore => None,
            EquivalenceLevel::Weak | EquivalenceLevel::Strong => Some(gen_dependency(chain, path)?),
        };
        Ok(Self { path, level, reference })
    }

    /// Returns `true` if `candidate` is a valid placement that behaves like the reference chain.
    pub fn accepts(&self, candidate: &[Element]) -> Result<bool> {
        if !position_valid(candidate) {
            return Ok(false);
        }
        let Some(reference) = &self.reference else {
            return Ok(true);
        };
        let lineage = gen_dependency(candidate, self.path)?;
        Ok(match self.level {
            EquivalenceLevel::Ignore => true,
            EquivalenceLevel::Weak => lineage.read == reference.read,
            EquivalenceLevel::Strong => lineage == *reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_analysis::{FieldSet, PathEffects};

    const PATH: TrafficPath = TrafficPath::Request;

    fn elem(name: &str, effects: PathEffects) -> Element {
        Element::new(name).with_effects(PATH, effects)
    }

    fn writer(name: &str, field: &str) -> Element {
        elem(name, PathEffects { write: FieldSet::from_names([field]), ..Default::default() })
    }

    fn reader(name: &str, field: &str) -> Element {
        elem(name, PathEffects { read: FieldSet::from_names([field]), ..Default::default() })
    }

    #[test]
    fn positions() {
        let c = Element::new("c").with_site(Site::Client);
        let s = Element::new("s").with_site(Site::Server);
        let d = Element::new("d");
        let n = Element::network();
        assert!(position_valid(&[c.clone(), d.clone(), n.clone(), s.clone()]));
        assert!(position_valid(&[n.clone(), d.clone(), s.clone()]));
        assert!(!position_valid(&[s.clone(), n.clone(), c.clone()]));
        assert!(!position_valid(&[n.clone(), c.clone()]));
        // No network marker: everything is on the client.
        assert!(position_valid(&[c.clone(), d.clone()]));
        assert!(!position_valid(&[c, s]));
    }

    #[test]
    fn swapping_dependent_elements() {
        let chain = [writer("A", "f1"), reader("B", "f1")];
        let swapped = [chain[1].clone(), chain[0].clone()];
        for level in [EquivalenceLevel::Weak, EquivalenceLevel::Strong] {
            assert!(equivalent(&chain, &chain, PATH, level).unwrap());
            assert!(!equivalent(&chain, &swapped, PATH, level).unwrap());
        }
        assert!(equivalent(&chain, &swapped, PATH, EquivalenceLevel::Ignore).unwrap());
    }

    #[test]
    fn invalid_placement_is_never_equivalent() {
        let chain = [Element::network(), Element::new("s").with_site(Site::Server)];
        let moved = [chain[1].clone(), chain[0].clone()];
        assert!(!equivalent(&chain, &moved, PATH, EquivalenceLevel::Ignore).unwrap());
    }

    #[test]
    fn strong_sees_records() {
        let drop = elem("acl", PathEffects { drop: true, ..Default::default() });
        let log = elem("logging", PathEffects {
            record: FieldSet::from_names(["user"]),
            ..Default::default()
        });
        let mut chain = vec![log, drop];
        init_dependency(&mut chain, PATH);
        let hoisted = [chain[1].clone(), chain[0].clone()];

        // Reads are untouched, but the log now sees the drop.
        assert!(equivalent(&chain, &hoisted, PATH, EquivalenceLevel::Weak).unwrap());
        assert!(!equivalent(&chain, &hoisted, PATH, EquivalenceLevel::Strong).unwrap());
    }

    #[test]
    fn independent_drop_can_move() {
        let mut chain = vec![
            writer("A", "f1"),
            elem("D", PathEffects { drop: true, ..Default::default() }),
        ];
        init_dependency(&mut chain, PATH);
        let hoisted = [chain[1].clone(), chain[0].clone()];
        for level in [EquivalenceLevel::Weak, EquivalenceLevel::Strong] {
            assert!(equivalent(&chain, &hoisted, PATH, level).unwrap());
        }
    }
}
