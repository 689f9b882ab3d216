//! Template content use cases.
//!
//! # Responsibility
//! - Save editor trees with their derived flat text.
//! - Load variants back as label-resolved documents for a catalog.
//!
//! # Invariants
//! - Flat text written from a tree always equals `encode(tree)`.
//! - Loading never fails on content: missing trees fall back to decoding the
//!   flat text, unknown keys render their raw key.

use crate::catalog::{resolve_document_labels, variable_usage, VariableCatalog, VariableUsage};
use crate::codec::decode_stored;
use crate::model::content::StoredContent;
use crate::model::document::Document;
use crate::model::template::{Template, TemplateId, TemplateKind, TemplateVariant};
use crate::repo::template_repo::{RepoError, TemplateListQuery, TemplateRepository};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TemplateServiceResult<T> = Result<T, TemplateServiceError>;

#[derive(Debug)]
pub enum TemplateServiceError {
    Repo(RepoError),
    VariantNotFound {
        template_id: TemplateId,
        language: String,
    },
}

impl Display for TemplateServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::VariantNotFound {
                template_id,
                language,
            } => write!(f, "template {template_id} has no `{language}` variant"),
        }
    }
}

impl Error for TemplateServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::VariantNotFound { .. } => None,
        }
    }
}

impl From<RepoError> for TemplateServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Variant content ready for the editing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document: Document,
    /// Whether the stored tree was used (otherwise the text was decoded).
    pub from_tree: bool,
    /// Keys the catalog does not know; rendered with their raw key.
    pub unknown_keys: Vec<String>,
    pub updated_at: i64,
}

/// Service wrapper over a [`TemplateRepository`].
pub struct TemplateService<R: TemplateRepository> {
    repo: R,
}

impl<R: TemplateRepository> TemplateService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_template(
        &self,
        kind: TemplateKind,
        name: impl Into<String>,
    ) -> TemplateServiceResult<TemplateId> {
        let template = Template::new(kind, name);
        let id = self.repo.create_template(&template)?;
        info!(
            "event=template_create module=service status=ok template={} kind={}",
            id,
            kind.as_str()
        );
        Ok(id)
    }

    pub fn list_templates(&self, kind: Option<TemplateKind>) -> TemplateServiceResult<Vec<Template>> {
        let query = TemplateListQuery {
            kind,
            ..TemplateListQuery::default()
        };
        Ok(self.repo.list_templates(&query)?)
    }

    pub fn delete_template(&self, id: TemplateId) -> TemplateServiceResult<()> {
        self.repo.soft_delete_template(id)?;
        Ok(())
    }

    /// Saves an editor tree; the flat text is derived from it.
    pub fn save_document(
        &self,
        id: TemplateId,
        language: &str,
        document: Document,
    ) -> TemplateServiceResult<TemplateVariant> {
        self.save(id, language, StoredContent::from_document(document))
    }

    /// Saves flat text only (imports, legacy content).
    pub fn save_text(
        &self,
        id: TemplateId,
        language: &str,
        text: impl Into<String>,
    ) -> TemplateServiceResult<TemplateVariant> {
        self.save(id, language, StoredContent::from_text(text))
    }

    /// Loads a variant and resolves token labels for its language.
    pub fn load_document(
        &self,
        id: TemplateId,
        language: &str,
        catalog: &dyn VariableCatalog,
    ) -> TemplateServiceResult<LoadedDocument> {
        let variant = self.variant(id, language)?;
        let mut document = decode_stored(&variant.content);
        let unknown_keys = resolve_document_labels(&mut document, catalog, &variant.language);
        debug!(
            "event=template_load module=service status=ok template={} language={} tree={} unknown={}",
            id,
            variant.language,
            variant.content.has_tree(),
            unknown_keys.len()
        );
        Ok(LoadedDocument {
            document,
            from_tree: variant.content.has_tree(),
            unknown_keys,
            updated_at: variant.updated_at,
        })
    }

    /// Reports which variables a stored variant references.
    pub fn variable_usage(
        &self,
        id: TemplateId,
        language: &str,
        catalog: &dyn VariableCatalog,
    ) -> TemplateServiceResult<VariableUsage> {
        let variant = self.variant(id, language)?;
        Ok(variable_usage(&decode_stored(&variant.content), catalog))
    }

    fn save(
        &self,
        id: TemplateId,
        language: &str,
        content: StoredContent,
    ) -> TemplateServiceResult<TemplateVariant> {
        let variant = self.repo.upsert_variant(id, language, &content)?;
        info!(
            "event=variant_save module=service status=ok template={} language={} tree={} text_chars={}",
            id,
            variant.language,
            variant.content.has_tree(),
            variant.content.text.chars().count()
        );
        Ok(variant)
    }

    fn variant(&self, id: TemplateId, language: &str) -> TemplateServiceResult<TemplateVariant> {
        self.repo
            .get_variant(id, language)?
            .ok_or_else(|| TemplateServiceError::VariantNotFound {
                template_id: id,
                language: language.to_string(),
            })
    }
}
