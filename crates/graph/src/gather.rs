//! Placement of site-agnostic elements.
//!
//! Moves the network marker so that every don't-care element lands on one side. Client and server
//! pinned elements never move relative to each other.

use crate::{
    Element, OptimizeError, Result, display_chain, network_position, position_valid,
};
use adn_config::Site;

/// The side the network marker was moved towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// No server-pinned element: everything runs on the client.
    AllClient,
    /// No client-pinned element: everything runs on the server.
    AllServer,
    /// Don't-care elements join the server, next to strongly consistent state.
    Server,
    /// Don't-care elements join the client.
    Client,
}

/// Decides where the network marker goes in `chain`.
///
/// `chain` must not contain the marker itself.
pub fn placement(chain: &[Element]) -> Placement {
    let has_client = chain.iter().any(|e| e.site.is_client());
    let has_server = chain.iter().any(|e| e.site.is_server());
    if !has_server {
        return Placement::AllClient;
    }
    if !has_client {
        return Placement::AllServer;
    }

    let strong_on = |site: Site| chain.iter().any(|e| e.site == site && e.is_strong());
    let client_strong = strong_on(Site::Client);
    let server_strong = strong_on(Site::Server);
    let cs_strong = strong_on(Site::DontCare);
    if server_strong && !client_strong && cs_strong {
        Placement::Server
    } else {
        // Ties go to the client.
        Placement::Client
    }
}

/// Moves the network marker of `chain` so that every don't-care element is placed.
///
/// Errors if the chain does not have exactly one network marker, or if the pinned elements are
/// out of order so that no marker position is valid.
pub fn gather(mut chain: Vec<Element>) -> Result<Vec<Element>> {
    let np = network_position(&chain)?;
    let network = chain.remove(np);

    let side = placement(&chain);
    let at = match side {
        Placement::AllClient => chain.len(),
        Placement::AllServer => 0,
        Placement::Server => chain.iter().rposition(|e| e.site.is_client()).map_or(0, |i| i + 1),
        Placement::Client => {
            chain.iter().position(|e| e.site.is_server()).unwrap_or(chain.len())
        }
    };
    chain.insert(at, network);

    if !position_valid(&chain) {
        return Err(OptimizeError::InvalidPlacement { chain: display_chain(&chain).to_string() });
    }
    debug!(?side, chain = %display_chain(&chain), "gathered chain");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_analysis::ElementState;
    use adn_config::Consistency;

    fn at(name: &str, site: Site) -> Element {
        Element::new(name).with_site(site)
    }

    fn strong(element: Element) -> Element {
        element.with_state(ElementState {
            stateful: true,
            consistency: Consistency::Strong,
            ..Default::default()
        })
    }

    fn names(chain: &[Element]) -> Vec<String> {
        chain.iter().map(Element::lib_name).collect()
    }

    #[test]
    fn single_sided() {
        let chain = vec![Element::network(), at("c", Site::Client), at("d", Site::DontCare)];
        assert_eq!(names(&gather(chain).unwrap()), ["c", "d", "network"]);

        let chain = vec![at("d", Site::DontCare), at("s", Site::Server), Element::network()];
        assert_eq!(names(&gather(chain).unwrap()), ["network", "d", "s"]);

        let chain = vec![Element::network()];
        assert_eq!(names(&gather(chain).unwrap()), ["network"]);
    }

    #[test]
    fn ties_go_to_the_client() {
        let chain = vec![
            at("c", Site::Client),
            Element::network(),
            at("d", Site::DontCare),
            at("s", Site::Server),
        ];
        assert_eq!(names(&gather(chain).unwrap()), ["c", "d", "network", "s"]);
    }

    #[test]
    fn strong_state_joins_the_server() {
        let chain = vec![
            at("c", Site::Client),
            strong(at("d", Site::DontCare)),
            Element::network(),
            strong(at("s", Site::Server)),
        ];
        assert_eq!(names(&gather(chain).unwrap()), ["c", "network", "d", "s"]);

        // A strong client keeps don't-care elements on the client.
        let chain = vec![
            strong(at("c", Site::Client)),
            Element::network(),
            strong(at("d", Site::DontCare)),
            strong(at("s", Site::Server)),
        ];
        assert_eq!(names(&gather(chain).unwrap()), ["c", "d", "network", "s"]);
    }

    #[test]
    fn errors() {
        let chain = vec![at("c", Site::Client)];
        assert!(matches!(gather(chain), Err(OptimizeError::MissingNetwork)));

        let chain = vec![at("s", Site::Server), Element::network(), at("c", Site::Client)];
        assert!(matches!(gather(chain), Err(OptimizeError::InvalidPlacement { .. })));
    }
}
