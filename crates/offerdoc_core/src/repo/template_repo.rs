//! Template repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist template headers and their per-language content variants.
//! - Keep SQL and JSON column handling inside the storage boundary.
//!
//! # Invariants
//! - Write paths validate headers and normalize language codes first.
//! - A variant is stored as flat text plus an optional JSON tree snapshot.
//! - An unreadable tree snapshot degrades to the text-only shape on read
//!   (logged); it never fails the read.

use crate::db::DbError;
use crate::model::content::StoredContent;
use crate::model::document::Document;
use crate::model::template::{
    normalize_language, Template, TemplateId, TemplateKind, TemplateValidationError,
    TemplateVariant,
};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TEMPLATE_SELECT_SQL: &str = "SELECT uuid, name, kind, is_deleted FROM templates";

const VARIANT_SELECT_SQL: &str = "SELECT
    template_uuid,
    language,
    content_text,
    content_tree,
    updated_at
FROM template_variants";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for template persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TemplateValidationError),
    Db(DbError),
    NotFound(TemplateId),
    /// A tree snapshot could not be serialized for writing.
    Encode(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "template not found: {id}"),
            Self::Encode(err) => write!(f, "cannot serialize document tree: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored template data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TemplateValidationError> for RepoError {
    fn from(value: TemplateValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// Filter for [`TemplateRepository::list_templates`].
#[derive(Debug, Clone, Default)]
pub struct TemplateListQuery {
    pub kind: Option<TemplateKind>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
}

/// Storage contract for templates and variants.
pub trait TemplateRepository {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId>;
    fn rename_template(&self, id: TemplateId, name: &str) -> RepoResult<()>;
    fn get_template(&self, id: TemplateId, include_deleted: bool) -> RepoResult<Option<Template>>;
    fn list_templates(&self, query: &TemplateListQuery) -> RepoResult<Vec<Template>>;
    fn soft_delete_template(&self, id: TemplateId) -> RepoResult<()>;

    /// Inserts or replaces the variant for `(template_id, language)`.
    fn upsert_variant(
        &self,
        template_id: TemplateId,
        language: &str,
        content: &StoredContent,
    ) -> RepoResult<TemplateVariant>;
    fn get_variant(&self, template_id: TemplateId, language: &str)
        -> RepoResult<Option<TemplateVariant>>;
    /// Variants of one template ordered by language code.
    fn list_variants(&self, template_id: TemplateId) -> RepoResult<Vec<TemplateVariant>>;
}

/// SQLite-backed template repository borrowing a migrated connection.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_active(&self, id: TemplateId) -> RepoResult<()> {
        match self.get_template(id, false)? {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound(id)),
        }
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId> {
        template.validate()?;
        self.conn.execute(
            "INSERT INTO templates (uuid, name, kind, is_deleted) VALUES (?1, ?2, ?3, ?4);",
            params![
                template.uuid.to_string(),
                template.name.trim(),
                template.kind.as_str(),
                template.is_deleted,
            ],
        )?;
        Ok(template.uuid)
    }

    fn rename_template(&self, id: TemplateId, name: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName.into());
        }
        let changed = self.conn.execute(
            "UPDATE templates
             SET name = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2 AND is_deleted = 0;",
            params![name.trim(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_template(&self, id: TemplateId, include_deleted: bool) -> RepoResult<Option<Template>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEMPLATE_SELECT_SQL} WHERE uuid = ?1 AND (?2 = 1 OR is_deleted = 0);"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), include_deleted])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_template_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_templates(&self, query: &TemplateListQuery) -> RepoResult<Vec<Template>> {
        let mut sql = format!("{TEMPLATE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }
        sql.push_str(" ORDER BY name COLLATE NOCASE ASC, uuid ASC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }
        Ok(templates)
    }

    fn soft_delete_template(&self, id: TemplateId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE templates
             SET is_deleted = 1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn upsert_variant(
        &self,
        template_id: TemplateId,
        language: &str,
        content: &StoredContent,
    ) -> RepoResult<TemplateVariant> {
        let language = normalize_language(language)?;
        self.require_active(template_id)?;

        let tree_json = content
            .tree
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(RepoError::Encode)?;

        self.conn.execute(
            "INSERT INTO template_variants (template_uuid, language, content_text, content_tree)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (template_uuid, language) DO UPDATE SET
                content_text = excluded.content_text,
                content_tree = excluded.content_tree,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                template_id.to_string(),
                language,
                content.text.as_str(),
                tree_json,
            ],
        )?;

        self.get_variant(template_id, &language)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "variant {template_id}/{language} missing after write"
            ))
        })
    }

    fn get_variant(
        &self,
        template_id: TemplateId,
        language: &str,
    ) -> RepoResult<Option<TemplateVariant>> {
        let language = normalize_language(language)?;
        let variant = self
            .conn
            .query_row(
                &format!("{VARIANT_SELECT_SQL} WHERE template_uuid = ?1 AND language = ?2;"),
                params![template_id.to_string(), language],
                |row| Ok(parse_variant_row(row)),
            )
            .optional()?;
        variant.transpose()
    }

    fn list_variants(&self, template_id: TemplateId) -> RepoResult<Vec<TemplateVariant>> {
        let mut stmt = self.conn.prepare(&format!(
            "{VARIANT_SELECT_SQL} WHERE template_uuid = ?1 ORDER BY language ASC;"
        ))?;
        let mut rows = stmt.query(params![template_id.to_string()])?;
        let mut variants = Vec::new();
        while let Some(row) = rows.next()? {
            variants.push(parse_variant_row(row)?);
        }
        Ok(variants)
    }
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<Template> {
    let uuid = parse_uuid(&row.get::<_, String>("uuid")?)?;
    let kind_text: String = row.get("kind")?;
    let kind = TemplateKind::parse(&kind_text)
        .ok_or_else(|| RepoError::InvalidData(format!("unknown template kind `{kind_text}`")))?;

    Ok(Template {
        uuid,
        name: row.get("name")?,
        kind,
        is_deleted: row.get("is_deleted")?,
    })
}

fn parse_variant_row(row: &Row<'_>) -> RepoResult<TemplateVariant> {
    let template_id = parse_uuid(&row.get::<_, String>("template_uuid")?)?;
    let language: String = row.get("language")?;
    let text: String = row.get("content_text")?;
    let tree_json: Option<String> = row.get("content_tree")?;

    let tree = tree_json.and_then(|json| match serde_json::from_str::<Document>(&json) {
        Ok(tree) => Some(tree),
        Err(err) => {
            warn!(
                "event=variant_tree_read module=repo status=degraded template={} language={} error={}",
                template_id, language, err
            );
            None
        }
    });

    Ok(TemplateVariant {
        template_id,
        language,
        content: StoredContent { text, tree },
        updated_at: row.get("updated_at")?,
    })
}

fn parse_uuid(value: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}`")))
}
