//! Template content engine for offer and contract templates.
//! This crate owns the document model, the flat-text codec and the
//! slash-command variable insertion flow; hosts only render and forward
//! input events.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod db;
pub mod editing;
pub mod logging;
pub mod menu;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod trigger;

pub use catalog::{
    resolve_document_labels, variable_usage, CatalogError, CatalogSnapshot, VariableCatalog,
    VariableUsage,
};
pub use codec::{decode, decode_stored, encode};
pub use config::{ConfigError, EngineConfig};
pub use editing::{apply_insertion, EditSession};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use menu::{
    build_menu, place_menu, EmptyState, KeyOutcome, Menu, MenuController, MenuEntry, MenuItem,
    MenuKey, PlacementConfig, Viewport, ViewportClamp,
};
pub use model::content::StoredContent;
pub use model::document::{Block, Document, HeadingLevel, Inline, Marks, TextRun, VariableToken};
pub use model::geometry::{Point, Rect, Size};
pub use model::template::{Template, TemplateId, TemplateKind, TemplateVariant};
pub use model::variable::{ValueType, VariableDescriptor};
pub use repo::template_repo::{
    RepoError, RepoResult, SqliteTemplateRepository, TemplateListQuery, TemplateRepository,
};
pub use search::fts::{search_templates, SearchError, SearchHit, SearchQuery};
pub use service::template_service::{LoadedDocument, TemplateService, TemplateServiceError};
pub use trigger::{
    detect_trigger, ArmedTrigger, CursorLocator, TriggerConfig, TriggerDetector, TriggerState,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
