//! Catalog assembly with the default providers in play.

use std::path::PathBuf;

use mm_convert::{build_catalog, build_graph, probe_tools, ToolPaths};

/// Paths that resolve nowhere, so assembly cannot depend on what happens to
/// be installed on the machine running the tests.
fn offline_paths() -> ToolPaths {
    ToolPaths {
        ffmpeg: Some(PathBuf::from("/nonexistent/ffmpeg")),
        pandoc: Some(PathBuf::from("/nonexistent/pandoc")),
        pdftoppm: Some(PathBuf::from("/nonexistent/pdftoppm")),
    }
}

#[test]
fn builtin_aliases_survive_assembly() {
    let catalog = build_catalog(&offline_paths()).unwrap();

    let edge = catalog.edge("markdown", "md").unwrap();
    assert_eq!(edge.cost, 1);
    assert_eq!(edge.operation, "rename");
    assert!(catalog.edge("yml", "yaml").is_some());
}

#[test]
fn image_edges_need_no_binaries() {
    let catalog = build_catalog(&offline_paths()).unwrap();

    let edge = catalog.edge("png", "jpg").unwrap();
    assert_eq!(edge.cost, 2);
    assert_eq!(edge.operation, "image_convert");
}

#[test]
fn pdf_to_docx_is_always_pinned() {
    let catalog = build_catalog(&offline_paths()).unwrap();

    let edge = catalog.edge("pdf", "docx").unwrap();
    assert_eq!(edge.cost, 20);
    assert_eq!(edge.operation, "pandoc_convert");
    assert!(edge.dependencies.contains("pandoc"));
}

#[test]
fn failed_providers_leave_the_rest_usable() {
    let catalog = build_catalog(&offline_paths()).unwrap();

    assert!(catalog.edge("wav", "mp3").is_none());
    assert!(catalog.edge("pdf", "png").is_some());
}

#[test]
fn rasterization_routes_with_poppler_reported_missing() {
    let paths = offline_paths();
    let graph = build_graph(&paths).unwrap();
    let available = probe_tools(&paths);
    assert!(available.is_empty());

    let plan = graph.resolve("pdf", "png", &available, false).unwrap().unwrap();

    assert_eq!(plan.route.formats(), ["pdf", "png"]);
    assert_eq!(plan.route.missing_tools(&available), ["poppler"]);
    assert_eq!(plan.steps[0].operation, "pdf_rasterize");
}
