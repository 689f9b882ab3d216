//! FFI use-case API for the Flutter editing surface.
//!
//! # Responsibility
//! - Expose the template content engine to Dart via FRB.
//! - Carry trees and catalogs as JSON strings so the Dart side needs no
//!   generated mirror of every node type.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures are reported in response envelopes (`ok=false` + message).
//! - Offsets crossing this boundary are UTF-16 code units, as Dart counts
//!   them. A variable token and a block boundary each count as one unit.
//!   Conversion to engine positions happens here.
//! - Engine limits come from the JSON file named by `OFFERDOC_CONFIG_PATH`,
//!   loaded once; a missing or invalid file means defaults.

use offerdoc_core::db::open_db;
use offerdoc_core::{
    apply_insertion, build_menu, core_version as core_version_inner, decode, decode_stored,
    encode, init_logging as init_logging_inner, ping as ping_inner, place_menu,
    search_templates, ArmedTrigger, CatalogSnapshot, Document, EmptyState, EngineConfig,
    MenuEntry, Point, SearchQuery, Size, SqliteTemplateRepository, StoredContent, TemplateId,
    TemplateKind, TemplateService, TemplateServiceError, TriggerDetector, TriggerState,
    VariableDescriptor, Viewport,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const SEARCH_DEFAULT_LIMIT: u32 = 10;
const SEARCH_LIMIT_MAX: u32 = 50;
const STORE_DB_FILE_NAME: &str = "offerdoc_templates.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Content response envelope: flat text plus tree snapshot JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentResponse {
    pub ok: bool,
    pub text: String,
    pub tree_json: String,
    /// Keys missing from the catalog (load paths only).
    pub unknown_keys: Vec<String>,
    pub message: String,
}

impl ContentResponse {
    fn from_document(document: &Document) -> Self {
        match serde_json::to_string(document) {
            Ok(tree_json) => Self {
                ok: true,
                text: encode(document),
                tree_json,
                unknown_keys: Vec::new(),
                message: String::new(),
            },
            Err(err) => Self::failure(format!("tree serialization failed: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: String::new(),
            tree_json: String::new(),
            unknown_keys: Vec::new(),
            message: message.into(),
        }
    }
}

/// Trigger state for one edit event.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerResponse {
    pub armed: bool,
    pub from: u32,
    pub to: u32,
    pub query: String,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// One rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    /// `divider` or `item`.
    pub kind: String,
    pub data_source: String,
    pub key: String,
    pub label: String,
    /// Position among selectable items; `None` for dividers.
    pub selectable_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuResponse {
    pub ok: bool,
    pub rows: Vec<MenuRow>,
    /// `catalog_unavailable`, `no_matches` or empty.
    pub empty_state: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Generic action envelope for template store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateActionResponse {
    pub ok: bool,
    pub template_id: Option<String>,
    pub message: String,
}

impl TemplateActionResponse {
    fn success(message: impl Into<String>, template_id: TemplateId) -> Self {
        Self {
            ok: true,
            template_id: Some(template_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            template_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSearchItem {
    pub template_id: String,
    pub name: String,
    pub kind: String,
    pub language: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSearchResponse {
    pub items: Vec<TemplateSearchItem>,
    pub message: String,
    pub applied_limit: u32,
}

/// Derives flat text from a tree snapshot.
///
/// # FFI contract
/// - Sync call, pure.
/// - `ok=false` only when `tree_json` is not a valid tree.
#[flutter_rust_bridge::frb(sync)]
pub fn content_encode(tree_json: String) -> ContentResponse {
    match parse_tree(&tree_json) {
        Ok(document) => ContentResponse::from_document(&document),
        Err(message) => ContentResponse::failure(message),
    }
}

/// Builds a tree from flat text (lossy fallback path).
///
/// # FFI contract
/// - Sync call, pure; any string decodes.
#[flutter_rust_bridge::frb(sync)]
pub fn content_decode(text: String) -> ContentResponse {
    ContentResponse::from_document(&decode(&text))
}

/// Opens stored `{text, tree?}` content for editing.
///
/// The tree wins when present; otherwise the text is decoded.
#[flutter_rust_bridge::frb(sync)]
pub fn content_open(stored_json: String) -> ContentResponse {
    match serde_json::from_str::<StoredContent>(&stored_json) {
        Ok(content) => ContentResponse::from_document(&decode_stored(&content)),
        Err(err) => ContentResponse::failure(format!("invalid stored content json: {err}")),
    }
}

impl TriggerResponse {
    fn idle() -> Self {
        Self {
            armed: false,
            from: 0,
            to: 0,
            query: String::new(),
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }
}

/// Computes the trigger state for one edit.
///
/// Input semantics:
/// - `cursor`: UTF-16 offset of the caret.
/// - `window`: text preceding the cursor (tokens as U+FFFC).
/// - `caret_x`/`caret_y`: caret coordinates resolved by the host, `None`
///   when the host could not resolve them (the trigger then stays idle).
///
/// `from`/`to` come back as UTF-16 offsets.
#[flutter_rust_bridge::frb(sync)]
pub fn trigger_detect(
    cursor: u32,
    window: String,
    caret_x: Option<f64>,
    caret_y: Option<f64>,
) -> TriggerResponse {
    let caret = caret_x
        .zip(caret_y)
        .map(|(x, y)| Point::new(x as f32, y as f32));
    let cursor = cursor as usize;
    let detector = TriggerDetector::new(engine_config().trigger);
    let TriggerState::Armed(trigger) = detector.detect(cursor, &window, &|_offset: usize| caret)
    else {
        return TriggerResponse::idle();
    };

    // The engine measured the span in chars; the host counts UTF-16 units.
    let span_units: usize = window
        .chars()
        .rev()
        .take(trigger.to - trigger.from)
        .map(char::len_utf16)
        .sum();
    let Some(from) = cursor.checked_sub(span_units) else {
        return TriggerResponse::idle();
    };
    TriggerResponse {
        armed: true,
        from: to_u32(from),
        to: to_u32(cursor),
        query: trigger.query,
        anchor_x: f64::from(trigger.anchor.x),
        anchor_y: f64::from(trigger.anchor.y),
    }
}

/// Builds the grouped menu for `query` against a catalog JSON snapshot.
///
/// An empty `catalog_json` means the catalog could not be loaded; an empty
/// `lang` uses the configured default language.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_build(query: String, catalog_json: String, lang: String) -> MenuResponse {
    let catalog = match parse_catalog(&catalog_json) {
        Ok(catalog) => catalog,
        Err(message) => {
            return MenuResponse {
                ok: false,
                rows: Vec::new(),
                empty_state: String::new(),
                message,
            }
        }
    };

    let state = TriggerState::Armed(ArmedTrigger {
        from: 0,
        to: query.chars().count() + 1,
        query,
        anchor: Point::default(),
    });
    let Some(menu) = build_menu(&state, &catalog, resolve_language(&lang)) else {
        return MenuResponse {
            ok: false,
            rows: Vec::new(),
            empty_state: String::new(),
            message: "trigger is not armed".to_string(),
        };
    };

    let mut next_index = 0u32;
    let rows = menu
        .display_items
        .iter()
        .map(|entry| match entry {
            MenuEntry::Divider { data_source } => MenuRow {
                kind: "divider".to_string(),
                data_source: data_source.clone(),
                key: String::new(),
                label: String::new(),
                selectable_index: None,
            },
            MenuEntry::Item(item) => {
                let row = MenuRow {
                    kind: "item".to_string(),
                    data_source: item.data_source.clone(),
                    key: item.key.clone(),
                    label: item.label.clone(),
                    selectable_index: Some(next_index),
                };
                next_index += 1;
                row
            }
        })
        .collect();

    MenuResponse {
        ok: true,
        rows,
        empty_state: match menu.empty_state {
            Some(EmptyState::CatalogUnavailable) => "catalog_unavailable".to_string(),
            Some(EmptyState::NoMatches) => "no_matches".to_string(),
            None => String::new(),
        },
        message: String::new(),
    }
}

/// Places a menu of the given size at the caret inside the viewport, using
/// the configured gap, margin and line height.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_place(
    anchor_x: f64,
    anchor_y: f64,
    menu_width: f64,
    menu_height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> MenuRect {
    let placement = engine_config().placement;
    let viewport = Viewport::new(
        Size::new(viewport_width as f32, viewport_height as f32),
        placement,
    );
    let rect = place_menu(
        Point::new(anchor_x as f32, anchor_y as f32),
        Size::new(menu_width as f32, menu_height as f32),
        &placement,
        &viewport,
    );
    MenuRect {
        x: f64::from(rect.x),
        y: f64::from(rect.y),
        width: f64::from(rect.width),
        height: f64::from(rect.height),
    }
}

/// Replaces `[from, to)` with a variable token and returns the new tree.
///
/// `from`/`to` are UTF-16 offsets as returned by `trigger_detect`.
/// `variable_json` is one descriptor as returned by `listVariables()`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_insert_variable(
    tree_json: String,
    from: u32,
    to: u32,
    variable_json: String,
    lang: String,
) -> ContentResponse {
    let document = match parse_tree(&tree_json) {
        Ok(document) => document,
        Err(message) => return ContentResponse::failure(message),
    };
    let variable = match serde_json::from_str::<VariableDescriptor>(&variable_json) {
        Ok(variable) => variable,
        Err(err) => return ContentResponse::failure(format!("invalid variable json: {err}")),
    };
    let trigger = ArmedTrigger {
        from: document.position_from_utf16(from as usize),
        to: document.position_from_utf16(to as usize),
        query: String::new(),
        anchor: Point::default(),
    };
    let updated = apply_insertion(&document, &trigger, &variable, resolve_language(&lang));
    ContentResponse::from_document(&updated)
}

/// Creates a template header (`kind` is `offer` or `contract`).
#[flutter_rust_bridge::frb(sync)]
pub fn template_create(kind: String, name: String) -> TemplateActionResponse {
    let Some(kind) = TemplateKind::parse(kind.trim()) else {
        return TemplateActionResponse::failure(format!("unknown template kind `{kind}`"));
    };
    match with_template_service(|service| service.create_template(kind, name.trim())) {
        Ok(id) => TemplateActionResponse::success("Template created.", id),
        Err(err) => TemplateActionResponse::failure(format!("template_create failed: {err}")),
    }
}

/// Saves the editor tree for one language variant.
#[flutter_rust_bridge::frb(sync)]
pub fn template_save(template_id: String, language: String, tree_json: String) -> TemplateActionResponse {
    let id = match parse_template_id(&template_id) {
        Ok(id) => id,
        Err(message) => return TemplateActionResponse::failure(message),
    };
    let document = match parse_tree(&tree_json) {
        Ok(document) => document,
        Err(message) => return TemplateActionResponse::failure(message),
    };
    match with_template_service(|service| service.save_document(id, &language, document)) {
        Ok(variant) => TemplateActionResponse::success("Variant saved.", variant.template_id),
        Err(err) => TemplateActionResponse::failure(format!("template_save failed: {err}")),
    }
}

/// Loads a language variant with labels resolved against `catalog_json`.
#[flutter_rust_bridge::frb(sync)]
pub fn template_load(template_id: String, language: String, catalog_json: String) -> ContentResponse {
    let id = match parse_template_id(&template_id) {
        Ok(id) => id,
        Err(message) => return ContentResponse::failure(message),
    };
    let catalog = match parse_catalog(&catalog_json) {
        Ok(catalog) => catalog,
        Err(message) => return ContentResponse::failure(message),
    };
    match with_template_service(|service| service.load_document(id, &language, &catalog)) {
        Ok(loaded) => {
            let mut response = ContentResponse::from_document(&loaded.document);
            response.unknown_keys = loaded.unknown_keys;
            response
        }
        Err(err) => ContentResponse::failure(format!("template_load failed: {err}")),
    }
}

/// Keyword search over stored variant text.
///
/// # FFI contract
/// - `limit` is clamped to `1..=50`; `None`/`0` uses the default.
/// - Never panics; failures come back as an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn template_search(
    text: String,
    language: Option<String>,
    limit: Option<u32>,
) -> TemplateSearchResponse {
    let applied_limit = normalize_search_limit(limit);
    let conn = match open_db(resolve_store_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            return TemplateSearchResponse {
                items: Vec::new(),
                message: format!("template_search failed: {err}"),
                applied_limit,
            }
        }
    };

    let mut query = SearchQuery::new(text.trim());
    query.language = language.filter(|value| !value.trim().is_empty());
    query.limit = applied_limit;

    match search_templates(&conn, &query) {
        Ok(hits) => {
            let items: Vec<TemplateSearchItem> = hits
                .into_iter()
                .map(|hit| TemplateSearchItem {
                    template_id: hit.template_id.to_string(),
                    name: hit.template_name,
                    kind: hit.kind.as_str().to_string(),
                    language: hit.language,
                    snippet: hit.snippet,
                })
                .collect();
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            TemplateSearchResponse {
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => {
            warn!("event=ffi_template_search module=ffi status=error error={}", err);
            TemplateSearchResponse {
                items: Vec::new(),
                message: format!("template_search failed: {err}"),
                applied_limit,
            }
        }
    }
}

fn parse_tree(tree_json: &str) -> Result<Document, String> {
    serde_json::from_str(tree_json).map_err(|err| format!("invalid tree json: {err}"))
}

fn parse_catalog(catalog_json: &str) -> Result<CatalogSnapshot, String> {
    if catalog_json.trim().is_empty() {
        return Ok(CatalogSnapshot::unavailable());
    }
    CatalogSnapshot::from_json_str(catalog_json).map_err(|err| err.to_string())
}

fn parse_template_id(value: &str) -> Result<TemplateId, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid template id `{value}`"))
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn normalize_search_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => SEARCH_DEFAULT_LIMIT,
        Some(value) => value.min(SEARCH_LIMIT_MAX),
    }
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("OFFERDOC_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn engine_config() -> &'static EngineConfig {
    ENGINE_CONFIG.get_or_init(|| match std::env::var("OFFERDOC_CONFIG_PATH") {
        Ok(raw) if !raw.trim().is_empty() => EngineConfig::load(raw.trim()),
        _ => EngineConfig::default(),
    })
}

fn resolve_language(lang: &str) -> &str {
    let trimmed = lang.trim();
    if trimmed.is_empty() {
        engine_config().default_language.as_str()
    } else {
        trimmed
    }
}

fn with_template_service<T>(
    f: impl FnOnce(
        &TemplateService<SqliteTemplateRepository<'_>>,
    ) -> Result<T, TemplateServiceError>,
) -> Result<T, String> {
    let conn = open_db(resolve_store_db_path()).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={}", err);
        format!("template store open failed: {err}")
    })?;
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));
    f(&service).map_err(|err| {
        warn!("event=ffi_template_call module=ffi status=error error={}", err);
        err.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::{
        content_decode, content_encode, content_open, core_version, editor_insert_variable,
        engine_config, init_logging, menu_build, menu_place, normalize_search_limit, ping,
        resolve_language, template_create, template_load, template_save, template_search,
        trigger_detect,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    const CATALOG: &str = r#"[
        {"key":"client_name","label":"Client","label_de":"Kunde","data_source":"client","value_type":"text"},
        {"key":"total","label":"Total","data_source":"computed","value_type":"currency"}
    ]"#;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_dir_and_unknown_level() {
        assert!(!init_logging("info".to_string(), "tmp/logs".to_string()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn decode_then_encode_returns_flat_text() {
        let decoded = content_decode("Dear {{client_name}}, **due** now".to_string());
        assert!(decoded.ok, "{}", decoded.message);
        assert_eq!(decoded.text, "Dear {{client_name}}, **due** now");

        let encoded = content_encode(decoded.tree_json);
        assert_eq!(encoded.text, "Dear {{client_name}}, **due** now");
    }

    #[test]
    fn encode_rejects_invalid_tree_json() {
        let response = content_encode("{\"blocks\": 3}".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid tree json"));
    }

    #[test]
    fn open_prefers_tree_over_text() {
        let stored = r#"{"text":"stale","tree":{"blocks":[{"type":"paragraph","content":[{"type":"text","text":"fresh","marks":{"bold":false,"italic":false}}]}]}}"#;
        let response = content_open(stored.to_string());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.text, "fresh");
    }

    #[test]
    fn trigger_detect_reports_range_and_anchor() {
        let response = trigger_detect(10, "Hello /pri".to_string(), Some(12.0), Some(30.0));
        assert!(response.armed);
        assert_eq!((response.from, response.to), (6, 10));
        assert_eq!(response.query, "pri");
        assert_eq!((response.anchor_x, response.anchor_y), (12.0, 30.0));

        // "\u{1F642} /pri" is 7 UTF-16 units but 6 chars.
        let emoji = trigger_detect(7, "\u{1F642} /pri".to_string(), Some(0.0), Some(0.0));
        assert!(emoji.armed);
        assert_eq!((emoji.from, emoji.to), (3, 7));

        let unresolved = trigger_detect(10, "Hello /pri".to_string(), None, None);
        assert!(!unresolved.armed);
    }

    #[test]
    fn menu_build_groups_and_reports_empty_states() {
        let response = menu_build(String::new(), CATALOG.to_string(), "de".to_string());
        assert!(response.ok, "{}", response.message);
        let kinds: Vec<_> = response.rows.iter().map(|row| row.kind.as_str()).collect();
        assert_eq!(kinds, vec!["divider", "item", "divider", "item"]);
        assert_eq!(response.rows[1].label, "Kunde");
        assert_eq!(response.rows[3].selectable_index, Some(1));

        let none = menu_build("zzz".to_string(), CATALOG.to_string(), "en".to_string());
        assert_eq!(none.empty_state, "no_matches");

        let unavailable = menu_build(String::new(), String::new(), "en".to_string());
        assert_eq!(unavailable.empty_state, "catalog_unavailable");
    }

    #[test]
    fn menu_place_flips_above_near_bottom_edge() {
        let rect = menu_place(10.0, 580.0, 200.0, 100.0, 800.0, 600.0);
        assert!(rect.y + rect.height <= 580.0);
    }

    #[test]
    fn insert_variable_replaces_trigger_range() {
        let tree = content_decode("Hello /pri".to_string()).tree_json;
        let response = editor_insert_variable(
            tree,
            6,
            10,
            r#"{"key":"total","label":"Total","data_source":"computed"}"#.to_string(),
            "en".to_string(),
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.text, "Hello {{total}}");
    }

    #[test]
    fn insert_variable_takes_utf16_offsets() {
        let tree = content_decode("\u{1F642} /pri".to_string()).tree_json;
        let response = editor_insert_variable(
            tree,
            3,
            7,
            r#"{"key":"total","label":"Total","data_source":"computed"}"#.to_string(),
            String::new(),
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.text, "\u{1F642} {{total}}");
    }

    #[test]
    fn empty_language_uses_configured_default() {
        assert_eq!(resolve_language("  "), engine_config().default_language);
        assert_eq!(resolve_language(" de "), "de");
    }

    #[test]
    fn search_limit_is_normalized() {
        assert_eq!(normalize_search_limit(None), 10);
        assert_eq!(normalize_search_limit(Some(0)), 10);
        assert_eq!(normalize_search_limit(Some(500)), 50);
        assert_eq!(normalize_search_limit(Some(7)), 7);
    }

    #[test]
    fn template_round_trip_through_store() {
        let token = unique_token("retainer");
        let created = template_create("offer".to_string(), format!("Offer {token}"));
        assert!(created.ok, "{}", created.message);
        let id = created.template_id.expect("created template id");

        let tree = content_decode(format!("Fee for {{{{client_name}}}} {token}")).tree_json;
        let saved = template_save(id.clone(), "DE".to_string(), tree);
        assert!(saved.ok, "{}", saved.message);

        let loaded = template_load(id.clone(), "de".to_string(), CATALOG.to_string());
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.text, format!("Fee for {{{{client_name}}}} {token}"));
        assert!(loaded.tree_json.contains("\"label\":\"Kunde\""));

        let hits = template_search(token, Some("de".to_string()), None);
        assert!(hits.items.iter().any(|item| item.template_id == id));
    }

    #[test]
    fn template_calls_reject_bad_input() {
        assert!(!template_create("invoice".to_string(), "X".to_string()).ok);
        assert!(!template_save("not-a-uuid".to_string(), "en".to_string(), "{}".to_string()).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}{nanos}")
    }
}
