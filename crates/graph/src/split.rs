//! Splitting a chain at the network marker.

use crate::{Element, display_chain};
use serde::{Deserialize, Serialize};

/// A deployment plan: at most one fused element on each side of the network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Runs in the client sidecar.
    #[serde(rename = "client_chain", with = "side")]
    pub client: Option<Element>,
    /// Runs in the server sidecar.
    #[serde(rename = "server_chain", with = "side")]
    pub server: Option<Element>,
}

impl Plan {
    /// Returns the client chain, of length 0 or 1.
    pub fn client_chain(&self) -> &[Element] {
        self.client.as_slice()
    }

    /// Returns the server chain, of length 0 or 1.
    pub fn server_chain(&self) -> &[Element] {
        self.server.as_slice()
    }

    /// Returns `true` if nothing needs to be deployed.
    pub fn is_empty(&self) -> bool {
        self.client.is_none() && self.server.is_none()
    }
}

/// Cuts `chain` at its first network marker and fuses each side into one element.
///
/// Without a marker the whole chain is the client side.
pub fn split_and_consolidate(chain: Vec<Element>) -> Plan {
    let np = chain.iter().position(Element::is_network).unwrap_or(chain.len());
    let mut elements = chain.into_iter();
    let client: Vec<_> = elements.by_ref().take(np).collect();
    let server: Vec<_> = elements.skip(1).collect();
    debug!(
        client = %display_chain(&client),
        server = %display_chain(&server),
        "split chain",
    );
    Plan { client: consolidate(client), server: consolidate(server) }
}

/// Fuses every element of `side` into the first one.
fn consolidate(side: Vec<Element>) -> Option<Element> {
    side.into_iter().reduce(|mut acc, element| {
        acc.fuse(element);
        acc
    })
}

/// Serializes a side as a list of 0 or 1 elements.
mod side {
    use crate::Element;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(
        element: &Option<Element>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        element.as_slice().serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Element>, D::Error> {
        let mut elements = Vec::<Element>::deserialize(deserializer)?;
        if elements.len() > 1 {
            return Err(serde::de::Error::invalid_length(elements.len(), &"at most one element"));
        }
        Ok(elements.pop())
    }
}
