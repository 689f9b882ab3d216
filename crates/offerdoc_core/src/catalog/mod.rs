//! Read-only variable catalog interface and in-memory snapshot.
//!
//! # Responsibility
//! - Enumerate variable descriptors in catalog order.
//! - Resolve localized labels with fallback to the default label.
//! - Refresh token labels in a document at render time.
//!
//! # Invariants
//! - A catalog snapshot is immutable for the lifetime of one menu session.
//! - Unknown keys degrade to the raw key as label; they are never errors.

use crate::model::document::Document;
use crate::model::variable::VariableDescriptor;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Read-only access to typed variable descriptors.
pub trait VariableCatalog {
    /// All descriptors in catalog order.
    fn list_variables(&self) -> &[VariableDescriptor];

    /// Whether a snapshot was loaded at all.
    fn is_available(&self) -> bool {
        !self.list_variables().is_empty()
    }

    fn find(&self, key: &str) -> Option<&VariableDescriptor> {
        self.list_variables()
            .iter()
            .find(|descriptor| descriptor.key == key)
    }

    /// Display label for `key` in `lang`; the raw key when unknown.
    fn resolve_label(&self, key: &str, lang: &str) -> String {
        match self.find(key) {
            Some(descriptor) => descriptor.localized_label(lang).to_string(),
            None => key.to_string(),
        }
    }
}

/// Catalog parse failure.
#[derive(Debug)]
pub enum CatalogError {
    Json(serde_json::Error),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid variable catalog json: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Immutable, already-resolved catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    variables: Vec<VariableDescriptor>,
}

impl CatalogSnapshot {
    pub fn new(variables: Vec<VariableDescriptor>) -> Self {
        Self { variables }
    }

    /// Snapshot standing in for a catalog that could not be loaded.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Parses the JSON array returned by `listVariables()`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let variables: Vec<VariableDescriptor> = serde_json::from_str(json)?;
        debug!(
            "event=catalog_load module=catalog status=ok variables={}",
            variables.len()
        );
        Ok(Self::new(variables))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableCatalog for CatalogSnapshot {
    fn list_variables(&self) -> &[VariableDescriptor] {
        &self.variables
    }
}

/// Keys referenced by a document, split by catalog membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableUsage {
    /// Known keys, deduplicated, in first-use order.
    pub known: Vec<String>,
    /// Keys absent from the catalog, deduplicated, in first-use order.
    pub unknown: Vec<String>,
}

impl VariableUsage {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Reports which variable keys a document uses and which are unknown.
pub fn variable_usage(document: &Document, catalog: &dyn VariableCatalog) -> VariableUsage {
    let mut seen = BTreeSet::new();
    let mut usage = VariableUsage::default();
    for key in document.variable_keys() {
        if !seen.insert(key) {
            continue;
        }
        if catalog.find(key).is_some() {
            usage.known.push(key.to_string());
        } else {
            usage.unknown.push(key.to_string());
        }
    }
    usage
}

/// Rewrites every token label for display in `lang`.
///
/// Returns the distinct unknown keys; each one renders its raw key.
pub fn resolve_document_labels(
    document: &mut Document,
    catalog: &dyn VariableCatalog,
    lang: &str,
) -> Vec<String> {
    let mut unknown = Vec::new();
    for token in document.variable_tokens_mut() {
        match catalog.find(&token.key) {
            Some(descriptor) => token.label = descriptor.localized_label(lang).to_string(),
            None => {
                token.label = token.key.clone();
                if !unknown.contains(&token.key) {
                    unknown.push(token.key.clone());
                }
            }
        }
    }

    if !unknown.is_empty() {
        warn!(
            "event=variable_unknown module=catalog status=degraded count={} keys={}",
            unknown.len(),
            unknown.join(",")
        );
    }
    unknown
}
