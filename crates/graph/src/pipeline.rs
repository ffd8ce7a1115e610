use crate::{
    Element, Plan, Reorderer, Result, cost_chain_optimize, gather, split_and_consolidate,
};
use adn_config::{OptimizerConfig, Strategy, TrafficPath};

/// Optimizes `chain` for `path` and returns the deployment plan.
///
/// The heuristic strategy reorders, then gathers, then splits. The exhaustive strategy searches
/// every permutation for the cheapest one instead.
#[instrument(name = "chain_optimize", level = "debug", skip_all, fields(%path))]
pub fn chain_optimize(
    chain: Vec<Element>,
    path: TrafficPath,
    config: &OptimizerConfig,
) -> Result<Plan> {
    let plan = match config.strategy {
        Strategy::Heuristic => {
            let mut reorderer = Reorderer::new(path, config.level, config.max_moves);
            let chain = reorderer.run(chain)?;
            let chain = gather(chain)?;
            split_and_consolidate(chain)
        }
        Strategy::Exhaustive => cost_chain_optimize(
            chain,
            path,
            config.level,
            &config.weights,
            config.max_exhaustive_len,
        )?,
    };
    let names = |side: &[Element]| side.iter().map(Element::lib_name).collect::<Vec<_>>();
    info!(
        %path,
        strategy = %config.strategy,
        client = ?names(plan.client_chain()),
        server = ?names(plan.server_chain()),
        "optimized chain",
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adn_analysis::{FieldSet, PathEffects};
    use adn_config::{EquivalenceLevel, Site};

    const PATH: TrafficPath = TrafficPath::Request;

    fn chain() -> Vec<Element> {
        let logging = Element::new("logging").with_site(Site::Client).with_effects(
            PATH,
            PathEffects { record: FieldSet::from_names(["user"]), ..Default::default() },
        );
        let acl = Element::new("acl").with_effects(
            PATH,
            PathEffects { read: FieldSet::from_names(["user"]), drop: true, ..Default::default() },
        );
        let compress = Element::new("compress").with_site(Site::Server).with_effects(
            PATH,
            PathEffects { write: FieldSet::from_names(["body"]), ..Default::default() },
        );
        vec![logging, Element::network(), acl, compress]
    }

    #[test]
    fn heuristic() {
        let plan = chain_optimize(chain(), PATH, &OptimizerConfig::default()).unwrap();
        // The acl moves in front of the logging element and joins the client.
        assert_eq!(plan.client.unwrap().lib_name(), "acl+logging");
        assert_eq!(plan.server.unwrap().lib_name(), "compress");

        // At the strong level the logging element must still see dropped requests.
        let config = OptimizerConfig::with_level(EquivalenceLevel::Strong);
        let plan = chain_optimize(chain(), PATH, &config).unwrap();
        assert_eq!(plan.client.unwrap().lib_name(), "logging+acl");
    }

    #[test]
    fn exhaustive() {
        let config = OptimizerConfig { strategy: Strategy::Exhaustive, ..Default::default() };
        let plan = chain_optimize(chain(), PATH, &config).unwrap();
        assert_eq!(plan.client.unwrap().lib_name(), "acl+logging");
        assert_eq!(plan.server.unwrap().lib_name(), "compress");
    }

    #[test]
    fn dropping_mirror() {
        let mirror = Element::new("mirror")
            .with_effects(PATH, PathEffects { drop: true, copy: true, ..Default::default() });
        let chain = vec![Element::new("x").with_site(Site::Client), Element::network(), mirror];
        let plan = chain_optimize(chain, PATH, &OptimizerConfig::default()).unwrap();
        let names: Vec<_> =
            plan.client.iter().chain(&plan.server).map(Element::lib_name).collect();
        assert!(names.iter().any(|name| name.contains("mirror")), "{names:?}");
    }
}
