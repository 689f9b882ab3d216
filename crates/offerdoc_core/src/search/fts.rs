//! FTS5 keyword search over variant flat text.
//!
//! # Responsibility
//! - Match user keywords against the flat text of template variants.
//! - Return typed hits carrying template, language and a snippet.
//!
//! # Invariants
//! - Variants of soft-deleted templates are never returned.
//! - Ordering is deterministic: rank, then most recent write, then ids.
//! - User text is quoted term by term, so typing never raises a syntax error.

use crate::db::DbError;
use crate::model::template::{normalize_language, TemplateId, TemplateKind};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DEFAULT_LIMIT: u32 = 20;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    InvalidLanguage(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLanguage(value) => write!(f, "invalid language filter `{value}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidLanguage(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// Search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    /// Restrict hits to one language variant.
    pub language: Option<String>,
    pub kind: Option<TemplateKind>,
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            kind: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn in_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub template_id: TemplateId,
    pub template_name: String,
    pub kind: TemplateKind,
    pub language: String,
    /// Matched flat text with hits wrapped in `[` `]`.
    pub snippet: String,
}

/// Runs a keyword search; blank queries return no hits.
pub fn search_templates(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
    let Some(match_expr) = build_match_expression(&query.text) else {
        return Ok(Vec::new());
    };
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT
            templates.uuid AS uuid,
            templates.name AS name,
            templates.kind AS kind,
            template_variants.language AS language,
            snippet(template_variants_fts, 0, '[', ']', ' ... ', 10) AS snippet
         FROM template_variants_fts
         JOIN template_variants ON template_variants.id = template_variants_fts.rowid
         JOIN templates ON templates.uuid = template_variants.template_uuid
         WHERE template_variants_fts MATCH ?
           AND templates.is_deleted = 0",
    );
    let mut bind_values: Vec<Value> = vec![Value::Text(match_expr)];

    if let Some(language) = &query.language {
        let language = normalize_language(language)
            .map_err(|_| SearchError::InvalidLanguage(language.clone()))?;
        sql.push_str(" AND template_variants.language = ?");
        bind_values.push(Value::Text(language));
    }
    if let Some(kind) = query.kind {
        sql.push_str(" AND templates.kind = ?");
        bind_values.push(Value::Text(kind.as_str().to_string()));
    }

    sql.push_str(
        " ORDER BY bm25(template_variants_fts), template_variants.updated_at DESC,
           templates.uuid ASC, template_variants.language ASC
         LIMIT ?",
    );
    bind_values.push(Value::Integer(i64::from(query.limit)));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut hits = Vec::new();
    while let Some(row) = rows.next()? {
        hits.push(parse_hit(row)?);
    }
    Ok(hits)
}

fn parse_hit(row: &Row<'_>) -> SearchResult<SearchHit> {
    let uuid_text: String = row.get("uuid")?;
    let template_id = Uuid::parse_str(&uuid_text)
        .map_err(|_| SearchError::InvalidData(format!("invalid uuid `{uuid_text}`")))?;
    let kind_text: String = row.get("kind")?;
    let kind = TemplateKind::parse(&kind_text)
        .ok_or_else(|| SearchError::InvalidData(format!("invalid kind `{kind_text}`")))?;

    Ok(SearchHit {
        template_id,
        template_name: row.get("name")?,
        kind,
        language: row.get("language")?,
        snippet: row.get("snippet")?,
    })
}

/// Quotes every whitespace-separated term and joins them with `AND`.
fn build_match_expression(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        return None;
    }
    Some(terms.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::build_match_expression;

    #[test]
    fn blank_text_has_no_expression() {
        assert_eq!(build_match_expression("  \n "), None);
    }

    #[test]
    fn terms_are_quoted_and_joined() {
        assert_eq!(
            build_match_expression(r#"net "30 days"#).as_deref(),
            Some(r#""net" AND """30" AND "days""#)
        );
    }
}
