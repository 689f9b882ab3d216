use offerdoc_core::db::open_db_in_memory;
use offerdoc_core::model::template::TemplateValidationError;
use offerdoc_core::{
    decode, Block, CatalogSnapshot, Document, Inline, RepoError, SqliteTemplateRepository,
    StoredContent, Template, TemplateKind, TemplateListQuery, TemplateRepository,
    TemplateService, TemplateServiceError, VariableDescriptor,
};
use uuid::Uuid;

fn catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![
        VariableDescriptor::new("client_name", "Client", "client").with_label("de", "Kunde"),
        VariableDescriptor::new("total", "Total", "computed"),
    ])
}

fn offer_tree() -> Document {
    Document::new(vec![
        Block::paragraph(vec![
            Inline::text("Dear "),
            Inline::variable("client_name", "Client"),
        ]),
        Block::BulletItem {
            content: vec![Inline::bold("Fee"), Inline::text(": "), Inline::variable("total", "Total")],
        },
        Block::HorizontalRule,
    ])
}

#[test]
fn create_get_and_list_templates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);

    let offer = Template::new(TemplateKind::Offer, "Web retainer");
    let contract = Template::new(TemplateKind::Contract, "Service agreement");
    repo.create_template(&offer).unwrap();
    repo.create_template(&contract).unwrap();

    assert_eq!(repo.get_template(offer.uuid, false).unwrap(), Some(offer.clone()));

    let offers = repo
        .list_templates(&TemplateListQuery {
            kind: Some(TemplateKind::Offer),
            ..TemplateListQuery::default()
        })
        .unwrap();
    assert_eq!(offers, vec![offer]);

    let all = repo.list_templates(&TemplateListQuery::default()).unwrap();
    let names: Vec<_> = all.iter().map(|template| template.name.as_str()).collect();
    assert_eq!(names, vec!["Service agreement", "Web retainer"]);
}

#[test]
fn create_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);

    let err = repo
        .create_template(&Template::new(TemplateKind::Offer, "   "))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TemplateValidationError::EmptyName)
    ));
}

#[test]
fn soft_deleted_templates_are_hidden_and_locked() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);
    let template = Template::new(TemplateKind::Offer, "Old offer");
    repo.create_template(&template).unwrap();

    repo.soft_delete_template(template.uuid).unwrap();

    assert_eq!(repo.get_template(template.uuid, false).unwrap(), None);
    let tombstone = repo.get_template(template.uuid, true).unwrap().unwrap();
    assert!(tombstone.is_deleted);

    let err = repo
        .upsert_variant(template.uuid, "en", &StoredContent::from_text("x"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == template.uuid));
    assert!(matches!(
        repo.rename_template(template.uuid, "New"),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn missing_template_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);
    let ghost = Uuid::new_v4();

    assert!(matches!(
        repo.soft_delete_template(ghost),
        Err(RepoError::NotFound(id)) if id == ghost
    ));
}

#[test]
fn upsert_replaces_the_variant_for_the_same_language() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);
    let template = Template::new(TemplateKind::Offer, "Retainer");
    repo.create_template(&template).unwrap();

    repo.upsert_variant(template.uuid, "en", &StoredContent::from_text("first"))
        .unwrap();
    let second = repo
        .upsert_variant(
            template.uuid,
            "EN",
            &StoredContent::from_document(offer_tree()),
        )
        .unwrap();

    assert_eq!(second.language, "en");
    assert_eq!(second.content.tree, Some(offer_tree()));
    assert_eq!(
        second.content.text,
        format!("Dear {{{{client_name}}}}\n• **Fee**: {{{{total}}}}\n{}", "─".repeat(24))
    );

    repo.upsert_variant(template.uuid, "de", &StoredContent::from_text("Hallo"))
        .unwrap();
    let languages: Vec<_> = repo
        .list_variants(template.uuid)
        .unwrap()
        .into_iter()
        .map(|variant| variant.language)
        .collect();
    assert_eq!(languages, vec!["de", "en"]);
}

#[test]
fn corrupt_tree_snapshot_degrades_to_flat_text() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTemplateRepository::new(&conn);
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));
    let template = Template::new(TemplateKind::Contract, "Lease");
    repo.create_template(&template).unwrap();
    repo.upsert_variant(
        template.uuid,
        "en",
        &StoredContent::from_text("Tenant: {{client_name}}"),
    )
    .unwrap();

    conn.execute(
        "UPDATE template_variants SET content_tree = '{\"blocks\": [{\"type\": \"table\"}]}';",
        [],
    )
    .unwrap();

    let variant = repo.get_variant(template.uuid, "en").unwrap().unwrap();
    assert_eq!(variant.content.tree, None);

    let loaded = service
        .load_document(template.uuid, "en", &catalog())
        .unwrap();
    assert!(!loaded.from_tree);
    assert_eq!(loaded.document, {
        let mut doc = decode("Tenant: {{client_name}}");
        if let Some(token) = doc.variable_tokens_mut().next() {
            token.label = "Client".to_string();
        }
        doc
    });
}

#[test]
fn service_saves_trees_and_loads_localized_labels() {
    let conn = open_db_in_memory().unwrap();
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));
    let id = service
        .create_template(TemplateKind::Offer, "Retainer")
        .unwrap();

    let variant = service.save_document(id, "de", offer_tree()).unwrap();
    assert!(variant.content.has_tree());

    let loaded = service.load_document(id, "de", &catalog()).unwrap();
    assert!(loaded.from_tree);
    assert!(loaded.unknown_keys.is_empty());
    let labels: Vec<_> = loaded
        .document
        .variable_tokens()
        .map(|token| token.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Kunde", "Total"]);
}

#[test]
fn service_reports_unknown_keys_without_failing() {
    let conn = open_db_in_memory().unwrap();
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));
    let id = service
        .create_template(TemplateKind::Offer, "Legacy")
        .unwrap();
    service
        .save_text(id, "en", "{{ghost_key}} and {{total}}")
        .unwrap();

    let loaded = service.load_document(id, "en", &catalog()).unwrap();
    assert_eq!(loaded.unknown_keys, vec!["ghost_key"]);
    let ghost = loaded.document.variable_tokens().next().unwrap();
    assert_eq!(ghost.label, "ghost_key");

    let usage = service.variable_usage(id, "en", &catalog()).unwrap();
    assert_eq!(usage.known, vec!["total"]);
    assert_eq!(usage.unknown, vec!["ghost_key"]);
}

#[test]
fn loading_a_missing_language_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));
    let id = service
        .create_template(TemplateKind::Contract, "NDA")
        .unwrap();

    let err = service.load_document(id, "fr", &catalog()).unwrap_err();
    assert!(matches!(
        err,
        TemplateServiceError::VariantNotFound { ref language, .. } if language == "fr"
    ));
}
