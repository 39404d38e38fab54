//! Conversion catalogs: which formats exist and how to move between them
//!
//! A catalog maps a source extension to every destination reachable in one
//! step. Each entry carries the relative cost of taking that step, the name
//! of the operation that performs it, and the external tools the operation
//! needs. The crate ships a small builtin catalog for alias renames; the
//! interesting edges come from [`CatalogProvider`] implementations that
//! interrogate the installed tools at runtime.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::warn;

use crate::error::{CatalogError, ProbeError};

const BUILTIN_CATALOG: &str = include_str!("../defaults/catalog.json");

/// A single one-step conversion as stored in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EdgeSpec {
    /// Relative expense of the step. Lower is preferred by the router.
    pub cost: u64,
    /// Name of the operation that performs the step.
    pub operation: String,
    /// External tools the operation needs, by probe name.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
}

impl EdgeSpec {
    pub fn new(cost: u64, operation: impl Into<String>) -> Self {
        EdgeSpec {
            cost,
            operation: operation.into(),
            dependencies: BTreeSet::new(),
        }
    }

    pub fn with_dependencies<I, S>(cost: u64, operation: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EdgeSpec {
            cost,
            operation: operation.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Mapping of source extension to the destinations reachable in one step.
///
/// Extensions are canonicalized to ASCII lowercase on every insertion, so
/// lookups never have to care about the case of user input or provider
/// output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatCatalog {
    entries: BTreeMap<String, BTreeMap<String, EdgeSpec>>,
}

impl FormatCatalog {
    pub fn new() -> Self {
        FormatCatalog::default()
    }

    /// The catalog embedded in the crate: extension aliases that no tool
    /// reports (jpg/jpeg, tif/tiff and friends).
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog from its JSON form
    /// (`{"src": {"dst": {"cost": .., "operation": .., "dependencies": [..]}}}`).
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, EdgeSpec>> = serde_json::from_str(text)?;
        let mut catalog = FormatCatalog::new();
        for (from, destinations) in raw {
            for (to, spec) in destinations {
                catalog.insert(&from, &to, spec);
            }
        }
        Ok(catalog)
    }

    /// Add one edge, replacing any previous spec for the same pair.
    pub fn insert(&mut self, from: &str, to: &str, spec: EdgeSpec) {
        self.entries
            .entry(from.to_ascii_lowercase())
            .or_default()
            .insert(to.to_ascii_lowercase(), spec);
    }

    /// Merge another catalog into this one, destination by destination.
    ///
    /// Entries from `other` win on conflicting `(source, destination)`
    /// pairs. Edges of `self` that `other` does not mention survive even
    /// when `other` also lists the source format.
    pub fn merge(&mut self, other: FormatCatalog) {
        for (from, destinations) in other.entries {
            let slot = self.entries.entry(from).or_default();
            for (to, spec) in destinations {
                slot.insert(to, spec);
            }
        }
    }

    /// Merge whatever `provider` can discover. A failing provider
    /// contributes nothing and is logged, never propagated.
    pub fn extend_discovered(&mut self, provider: &dyn CatalogProvider) {
        match provider.discover() {
            Ok(found) => {
                self.merge(found);
            }
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "catalog provider failed, skipping");
            }
        }
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&EdgeSpec> {
        self.entries.get(from)?.get(to)
    }

    pub fn destinations(&self, from: &str) -> Option<&BTreeMap<String, EdgeSpec>> {
        self.entries.get(from)
    }

    pub fn contains_source(&self, format: &str) -> bool {
        self.entries.contains_key(format)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, EdgeSpec>)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A source of conversion edges discovered at runtime, one per integrated
/// tool.
pub trait CatalogProvider {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Enumerate the one-step conversions this tool offers right now.
    fn discover(&self) -> Result<FormatCatalog, ProbeError>;
}
