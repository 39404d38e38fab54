//! Randomized checks of the router against a brute-force reference.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use mm_convert::{EdgeSpec, FormatCatalog, FormatGraph};

const NODES: [&str; 5] = ["fmta", "fmtb", "fmtc", "fmtd", "fmte"];
const TOOLS: [&str; 2] = ["toolzero", "toolone"];

type RawEdge = (usize, usize, u64, bool, bool);

fn catalog_from(edges: &[RawEdge]) -> FormatCatalog {
    let mut catalog = FormatCatalog::new();
    for (from, to, cost, t0, t1) in edges {
        if from == to {
            continue;
        }
        let mut deps: Vec<&str> = Vec::new();
        if *t0 {
            deps.push(TOOLS[0]);
        }
        if *t1 {
            deps.push(TOOLS[1]);
        }
        catalog.insert(NODES[*from], NODES[*to], EdgeSpec::with_dependencies(*cost, "op", deps));
    }
    catalog
}

/// Flattened adjacency view of the deduplicated catalog.
fn adjacency(catalog: &FormatCatalog) -> BTreeMap<String, Vec<(String, u64, BTreeSet<String>)>> {
    let mut adjacency = BTreeMap::new();
    for (from, destinations) in catalog.iter() {
        let edges: Vec<_> = destinations
            .iter()
            .map(|(to, spec)| (to.clone(), spec.cost, spec.dependencies.clone()))
            .collect();
        adjacency.insert(from.clone(), edges);
    }
    adjacency
}

/// Cheapest effective cost over every simple path, by exhaustive search.
#[allow(clippy::too_many_arguments)]
fn brute_force(
    adjacency: &BTreeMap<String, Vec<(String, u64, BTreeSet<String>)>>,
    available: &BTreeSet<String>,
    penalty: u64,
    current: &str,
    goal: &str,
    visited: &mut BTreeSet<String>,
    requirements: &BTreeSet<String>,
    ignore_deps: bool,
) -> Option<u64> {
    if current == goal {
        return Some(0);
    }
    visited.insert(current.to_string());
    let mut best: Option<u64> = None;
    for (to, cost, deps) in adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]) {
        if visited.contains(to) {
            continue;
        }
        let mut next_requirements = requirements.clone();
        next_requirements.extend(deps.iter().cloned());
        let mut step = *cost;
        if !ignore_deps && !next_requirements.is_subset(available) {
            step += penalty;
        }
        let rest = brute_force(
            adjacency,
            available,
            penalty,
            to,
            goal,
            visited,
            &next_requirements,
            ignore_deps,
        );
        if let Some(rest) = rest {
            let total = step + rest;
            if best.map_or(true, |current_best| total < current_best) {
                best = Some(total);
            }
        }
    }
    visited.remove(current);
    best
}

fn edges_strategy() -> impl Strategy<Value = Vec<RawEdge>> {
    prop::collection::vec(
        (0..NODES.len(), 0..NODES.len(), 1..=20u64, any::<bool>(), any::<bool>()),
        1..16,
    )
}

proptest! {
    #[test]
    fn router_matches_brute_force(
        edges in edges_strategy(),
        start in 0..NODES.len(),
        goal in 0..NODES.len(),
        avail0 in any::<bool>(),
        avail1 in any::<bool>(),
        ignore_deps in any::<bool>(),
    ) {
        let catalog = catalog_from(&edges);
        let graph = FormatGraph::from_catalog(&catalog);
        prop_assume!(graph.contains(NODES[start]));

        let mut available = BTreeSet::new();
        if avail0 {
            available.insert(TOOLS[0].to_string());
        }
        if avail1 {
            available.insert(TOOLS[1].to_string());
        }

        let observed = graph
            .shortest_route(NODES[start], NODES[goal], &available, ignore_deps)
            .unwrap();

        let penalty = graph.total_edge_cost().saturating_add(1);
        let expected = brute_force(
            &adjacency(&catalog),
            &available,
            penalty,
            NODES[start],
            NODES[goal],
            &mut BTreeSet::new(),
            &BTreeSet::new(),
            ignore_deps,
        );

        let observed_cost = observed.as_ref().map(|route| route.cost());
        match (observed_cost, expected) {
            (None, None) => {}
            (Some(found), Some(best)) => prop_assert_eq!(found, best),
            _ => prop_assert!(
                false,
                "router found {:?}, brute force found {:?}",
                observed_cost,
                expected
            ),
        }
    }

    #[test]
    fn reported_cost_matches_a_replay_of_the_route(
        edges in edges_strategy(),
        start in 0..NODES.len(),
        goal in 0..NODES.len(),
        avail0 in any::<bool>(),
    ) {
        let catalog = catalog_from(&edges);
        let graph = FormatGraph::from_catalog(&catalog);
        prop_assume!(graph.contains(NODES[start]));

        let mut available = BTreeSet::new();
        if avail0 {
            available.insert(TOOLS[0].to_string());
        }

        let Some(route) = graph
            .shortest_route(NODES[start], NODES[goal], &available, false)
            .unwrap()
        else {
            return Ok(());
        };

        let penalty = graph.total_edge_cost().saturating_add(1);
        let mut replayed_cost = 0u64;
        let mut replayed_requirements = BTreeSet::new();
        for pair in route.formats().windows(2) {
            let spec = catalog.edge(&pair[0], &pair[1]).unwrap();
            replayed_requirements.extend(spec.dependencies.iter().cloned());
            replayed_cost += spec.cost;
            if !replayed_requirements.is_subset(&available) {
                replayed_cost += penalty;
            }
        }

        prop_assert_eq!(route.cost(), replayed_cost);
        prop_assert_eq!(route.requirements(), &replayed_requirements);
    }

    #[test]
    fn routing_twice_gives_the_same_answer(
        edges in edges_strategy(),
        start in 0..NODES.len(),
        goal in 0..NODES.len(),
    ) {
        let catalog = catalog_from(&edges);
        let graph = FormatGraph::from_catalog(&catalog);
        prop_assume!(graph.contains(NODES[start]));
        let available = BTreeSet::new();

        let first = graph.shortest_route(NODES[start], NODES[goal], &available, false).unwrap();
        let second = graph.shortest_route(NODES[start], NODES[goal], &available, false).unwrap();

        prop_assert_eq!(
            first.as_ref().map(|route| route.formats()),
            second.as_ref().map(|route| route.formats())
        );
        prop_assert_eq!(first.map(|route| route.cost()), second.map(|route| route.cost()));
    }
}
