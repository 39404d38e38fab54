//! Dependency-aware routing over the conversion graph
//!
//! The router runs Dijkstra over [`FormatGraph`] with one twist: edges whose
//! accumulated tool requirements are not covered by the caller's available
//! set get a penalty added to their cost. Penalized routes stay in play, so
//! when no fully-satisfiable route exists the caller still gets the best
//! route along with the tools it would need.
//!
//! The penalty is derived from the graph itself (one more than the sum of
//! every base edge cost), which guarantees that any route without unmet
//! requirements beats any route with them, whatever the catalog's costs.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};
use std::fmt;

use tracing::debug;

use crate::error::RouteError;
use crate::graph::FormatGraph;

/// A resolved route: the formats visited in order, the external tools the
/// route needs, and its accumulated effective cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    formats: Vec<String>,
    requirements: BTreeSet<String>,
    cost: u64,
}

impl Route {
    /// Formats visited in order, starting format first.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Union of the dependencies of every traversed edge.
    pub fn requirements(&self) -> &BTreeSet<String> {
        &self.requirements
    }

    /// Accumulated cost, including any unmet-dependency penalties.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Number of conversion steps (one less than the formats listed).
    pub fn step_count(&self) -> usize {
        self.formats.len().saturating_sub(1)
    }

    /// Required tools not present in `available`, sorted.
    pub fn missing_tools(&self, available: &BTreeSet<String>) -> Vec<String> {
        self.requirements.difference(available).cloned().collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formats.join(" -> "))
    }
}

/// One concrete conversion derived from consecutive formats in a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStep {
    pub from: String,
    pub to: String,
    pub operation: String,
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.operation)
    }
}

/// A route together with its assembled steps, ready for execution.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub route: Route,
    pub steps: Vec<ConversionStep>,
}

/// Frontier entry ordered for a min-heap: cheapest first, then earliest
/// inserted. The explicit sequence number makes tie-breaking deterministic.
#[derive(Debug)]
struct Frontier {
    cost: u64,
    seq: u64,
    format: String,
    path: Vec<String>,
    requirements: BTreeSet<String>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl FormatGraph {
    /// Find the cheapest route from `start` to `goal`.
    ///
    /// `available` is the set of usable external tools; `ignore_deps`
    /// disables the penalty so missing tools are treated as present.
    /// Returns `Ok(None)` when the goal is unreachable. An unknown start
    /// format is an error; an unknown goal is just unreachable.
    pub fn shortest_route(
        &self,
        start: &str,
        goal: &str,
        available: &BTreeSet<String>,
        ignore_deps: bool,
    ) -> Result<Option<Route>, RouteError> {
        let start = start.to_ascii_lowercase();
        let goal = goal.to_ascii_lowercase();

        if !self.contains(&start) {
            return Err(RouteError::UnknownStart(start));
        }

        debug!(%start, %goal, ignore_deps, "searching for conversion route");
        let penalty = self.total_edge_cost().saturating_add(1);

        let mut heap = BinaryHeap::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut sequence: u64 = 0;

        heap.push(Frontier {
            cost: 0,
            seq: sequence,
            format: start,
            path: Vec::new(),
            requirements: BTreeSet::new(),
        });

        while let Some(entry) = heap.pop() {
            let Frontier {
                cost,
                format,
                mut path,
                requirements,
                ..
            } = entry;

            if visited.contains(&format) {
                continue;
            }
            visited.insert(format.clone());
            path.push(format.clone());

            if format == goal {
                debug!(route = %path.join(" -> "), cost, "route found");
                return Ok(Some(Route {
                    formats: path,
                    requirements,
                    cost,
                }));
            }

            let Some(node) = self.node(&format) else {
                continue;
            };
            for edge in node.edges() {
                if visited.contains(&edge.to) {
                    continue;
                }

                let mut next_requirements = requirements.clone();
                next_requirements.extend(edge.dependencies.iter().cloned());

                let mut step_cost = edge.cost;
                if !ignore_deps && !next_requirements.is_subset(available) {
                    step_cost = step_cost.saturating_add(penalty);
                }

                sequence += 1;
                heap.push(Frontier {
                    cost: cost.saturating_add(step_cost),
                    seq: sequence,
                    format: edge.to.clone(),
                    path: path.clone(),
                    requirements: next_requirements,
                });
            }
        }

        Ok(None)
    }

    /// Turn a route into executable steps by looking up the operation of
    /// each consecutive format pair. The first matching edge wins.
    pub fn assemble(&self, route: &Route) -> Result<Vec<ConversionStep>, RouteError> {
        let mut steps = Vec::with_capacity(route.step_count());
        for pair in route.formats().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let edge = self
                .edge_between(from, to)
                .ok_or_else(|| RouteError::MissingEdge {
                    from: from.clone(),
                    to: to.clone(),
                })?;
            steps.push(ConversionStep {
                from: from.clone(),
                to: to.clone(),
                operation: edge.operation.clone(),
            });
        }
        Ok(steps)
    }

    /// Route and assemble in one call.
    pub fn resolve(
        &self,
        start: &str,
        goal: &str,
        available: &BTreeSet<String>,
        ignore_deps: bool,
    ) -> Result<Option<RoutePlan>, RouteError> {
        let route = match self.shortest_route(start, goal, available, ignore_deps)? {
            Some(route) => route,
            None => return Ok(None),
        };
        let steps = self.assemble(&route)?;
        Ok(Some(RoutePlan { route, steps }))
    }
}
