//! Multi-step file conversion for the mm toolchain
//!
//!     This crate turns "I have a .docx and want a .png" into an executed chain of
//!     conversions. It owns everything except the shell surface: the catalog of known
//!     conversions, the routing over that catalog, and the pipeline that runs the
//!     chosen route through scratch files.
//!
//!     TLDR: For converter authors:
//!         - A converter contributes twice: a CatalogProvider that says which extension
//!           pairs it can handle (with a cost and its tool dependencies), and a
//!           ConversionOp that does one file-to-file step.
//!         - Both halves of a tool live together under ./tools/<tool>.rs.
//!         - Providers that shell out must keep the parsing half pure, so it can be
//!           unit tested against captured output without the tool installed.
//!         - A provider failing at discovery only costs its own edges. It must never
//!           take the whole catalog down.
//!
//! Architecture
//!
//!     The flow is catalog -> graph -> route -> pipeline. The catalog is merged from a
//!     builtin table plus one provider per tool, later contributions winning per
//!     destination. The graph is the routable view of the catalog, and the router runs
//!     a cheapest-path search over it that knows about missing tools: edges whose
//!     accumulated requirements are not installed are penalized rather than removed,
//!     so a worse-but-runnable route wins and an unrunnable one still gets reported
//!     with the tools it would need.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── catalog.rs              # EdgeSpec, FormatCatalog, CatalogProvider trait
//!     ├── graph.rs                # FormatGraph built from a catalog
//!     ├── route.rs                # Dependency-aware cheapest-path search
//!     ├── op.rs                   # ConversionOp trait definition
//!     ├── registry.rs             # OperationRegistry for op discovery and selection
//!     ├── pipeline.rs             # Runs steps through a scratch directory
//!     ├── probe.rs                # Binary resolution and tool availability
//!     ├── detect.rs               # Extension and content sniffing
//!     ├── tools
//!     │   ├── <tool>.rs           # Provider + op for one converter
//!     │   └── mod.rs
//!     ├── defaults
//!     │   └── catalog.json        # Builtin rename edges
//!     └── lib.rs
//!
//!     This is a pure lib: it powers the mm binary but never prints, never reads argv,
//!     and only touches env vars through the documented MM_*_BIN overrides.
//!
//! Execution
//!
//!     The pipeline stages every intermediate in a scratch directory and only moves
//!     the final file onto the requested output. A step that fails leaves the
//!     filesystem as it found it, apart from tool side effects we cannot see.
//!
//! Tool Selection
//!
//!     The lineup is pragmatic rather than complete:
//!
//!     - image: in process, no install needed, covers the common raster pairs cheaply.
//!     - pandoc: one binary that covers essentially every document format worth having.
//!     - poppler: pdftoppm is the reliable way to rasterize a PDF page.
//!     - ffmpeg: same story for audio and video containers.
//!
//!     Everything external is probed, never assumed. Routing works on machines with
//!     none of the tools installed; execution tells you what to install instead of
//!     failing halfway.

pub mod catalog;
pub mod detect;
pub mod error;
pub mod graph;
pub mod op;
pub mod pipeline;
pub mod probe;
pub mod registry;
pub mod route;
pub mod tools;

pub use catalog::{CatalogProvider, EdgeSpec, FormatCatalog};
pub use error::{CatalogError, OpError, PipelineError, ProbeError, RouteError};
pub use graph::{ConversionEdge, FormatGraph, FormatNode};
pub use op::ConversionOp;
pub use pipeline::run_pipeline;
pub use probe::{probe_report, probe_tools, ToolPaths, ToolStatus};
pub use registry::OperationRegistry;
pub use route::{ConversionStep, Route, RoutePlan};

/// Builds the full conversion catalog: the builtin rename table, then every
/// default provider in order, then the pinned pdf -> docx edge. Providers
/// that fail to discover are logged and skipped.
pub fn build_catalog(paths: &ToolPaths) -> Result<FormatCatalog, CatalogError> {
    let mut catalog = FormatCatalog::builtin()?;
    for provider in tools::default_providers(paths) {
        catalog.extend_discovered(provider.as_ref());
    }
    // pandoc does not list pdf among its input formats, so this edge never
    // comes out of discovery
    catalog.insert(
        "pdf",
        "docx",
        EdgeSpec::with_dependencies(20, "pandoc_convert", [probe::PANDOC]),
    );
    Ok(catalog)
}

/// Builds the routable graph for the current machine.
pub fn build_graph(paths: &ToolPaths) -> Result<FormatGraph, CatalogError> {
    Ok(FormatGraph::from_catalog(&build_catalog(paths)?))
}
