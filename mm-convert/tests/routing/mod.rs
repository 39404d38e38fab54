//! End-to-end routing over hand-built catalogs.

use std::collections::BTreeSet;

use mm_convert::{EdgeSpec, FormatCatalog, FormatGraph, RouteError};

/// Two ways from docx to txt: a cheap chain behind an external tool and a
/// pricier chain that needs nothing.
fn forked_graph() -> FormatGraph {
    let mut catalog = FormatCatalog::new();
    catalog.insert("docx", "md", EdgeSpec::with_dependencies(1, "fast", ["fastconv"]));
    catalog.insert("md", "txt", EdgeSpec::with_dependencies(1, "fast", ["fastconv"]));
    catalog.insert("docx", "rtf", EdgeSpec::new(2, "slow"));
    catalog.insert("rtf", "txt", EdgeSpec::new(1, "slow"));
    FormatGraph::from_catalog(&catalog)
}

fn tools(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn cheapest_chain_wins_when_its_tool_is_installed() {
    let graph = forked_graph();

    let route = graph
        .shortest_route("docx", "txt", &tools(&["fastconv"]), false)
        .unwrap()
        .unwrap();

    assert_eq!(route.formats(), ["docx", "md", "txt"]);
    assert_eq!(route.cost(), 2);
    assert!(route.missing_tools(&tools(&["fastconv"])).is_empty());
}

#[test]
fn missing_tool_diverts_to_the_runnable_chain() {
    let graph = forked_graph();

    let route = graph
        .shortest_route("docx", "txt", &tools(&[]), false)
        .unwrap()
        .unwrap();

    assert_eq!(route.formats(), ["docx", "rtf", "txt"]);
    assert_eq!(route.cost(), 3);
    assert!(route.requirements().is_empty());
}

#[test]
fn ignoring_deps_restores_the_cheap_chain() {
    let graph = forked_graph();

    let route = graph
        .shortest_route("docx", "txt", &tools(&[]), true)
        .unwrap()
        .unwrap();

    assert_eq!(route.formats(), ["docx", "md", "txt"]);
    assert_eq!(route.missing_tools(&tools(&[])), ["fastconv"]);
}

#[test]
fn unreachable_goal_is_none_not_an_error() {
    let graph = forked_graph();
    let route = graph.shortest_route("docx", "epub", &tools(&[]), false).unwrap();
    assert!(route.is_none());
}

#[test]
fn unknown_start_is_an_error() {
    let graph = forked_graph();
    let result = graph.shortest_route("wav", "txt", &tools(&[]), false);
    assert!(matches!(result, Err(RouteError::UnknownStart(format)) if format == "wav"));
}

#[test]
fn resolution_is_deterministic() {
    let graph = forked_graph();
    let available = tools(&["fastconv"]);

    let first = graph.resolve("docx", "txt", &available, false).unwrap().unwrap();
    for _ in 0..10 {
        let again = graph.resolve("docx", "txt", &available, false).unwrap().unwrap();
        assert_eq!(again.route.formats(), first.route.formats());
        assert_eq!(again.route.cost(), first.route.cost());
        assert_eq!(again.steps, first.steps);
    }
}

#[test]
fn steps_name_the_operation_for_each_hop() {
    let graph = forked_graph();

    let plan = graph
        .resolve("docx", "txt", &tools(&[]), false)
        .unwrap()
        .unwrap();

    let ops: Vec<&str> = plan.steps.iter().map(|step| step.operation.as_str()).collect();
    assert_eq!(ops, ["slow", "slow"]);
    assert_eq!(plan.steps[0].from, "docx");
    assert_eq!(plan.steps[1].to, "txt");
}
