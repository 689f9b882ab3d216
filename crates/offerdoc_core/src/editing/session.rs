//! Per-session edit handling.
//!
//! # Responsibility
//! - Recompute the trigger on every edit from the window before the cursor.
//! - Route menu keys and pointer events; commit or cancel synchronously.
//!
//! # Invariants
//! - The session holds the only trigger state; the open menu lives and dies
//!   with an armed trigger.

use super::insertion::apply_insertion;
use crate::catalog::VariableCatalog;
use crate::codec::encode;
use crate::config::EngineConfig;
use crate::menu::{build_menu_for_query, KeyOutcome, MenuController, MenuItem, MenuKey};
use crate::model::document::Document;
use crate::model::variable::VariableDescriptor;
use crate::trigger::{CursorLocator, TriggerDetector, TriggerState};
use log::debug;

/// One editing session over a template variant.
///
/// Owns the trigger state and the open menu; both are dropped with the
/// session. The catalog snapshot stays fixed for the session's lifetime.
pub struct EditSession<C: VariableCatalog> {
    document: Document,
    cursor: usize,
    trigger: TriggerState,
    menu: Option<MenuController>,
    catalog: C,
    lang: String,
    detector: TriggerDetector,
}

impl<C: VariableCatalog> EditSession<C> {
    pub fn new(document: Document, catalog: C, lang: impl Into<String>) -> Self {
        Self::with_detector(document, catalog, lang, TriggerDetector::default())
    }

    pub fn with_detector(
        document: Document,
        catalog: C,
        lang: impl Into<String>,
        detector: TriggerDetector,
    ) -> Self {
        Self {
            document,
            cursor: 0,
            trigger: TriggerState::Idle,
            menu: None,
            catalog,
            lang: lang.into(),
            detector,
        }
    }

    /// Session using the configured default language and trigger limits.
    pub fn from_config(document: Document, catalog: C, config: &EngineConfig) -> Self {
        Self::with_detector(
            document,
            catalog,
            config.default_language.clone(),
            TriggerDetector::new(config.trigger),
        )
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn trigger(&self) -> &TriggerState {
        &self.trigger
    }

    pub fn menu(&self) -> Option<&MenuController> {
        self.menu.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.lang
    }

    /// Flat text of the current document, for persistence/search/diff.
    pub fn flat_text(&self) -> String {
        encode(&self.document)
    }

    /// Applies a content-change event and recomputes the trigger state.
    pub fn on_edit(
        &mut self,
        document: Document,
        cursor: usize,
        locator: &dyn CursorLocator,
    ) -> &TriggerState {
        self.document = document;
        let (cursor, window) = self
            .document
            .window_before(cursor, self.detector.config().window_chars);
        self.cursor = cursor;
        self.trigger = self.detector.detect(self.cursor, &window, locator);

        match self.trigger.query() {
            None => self.menu = None,
            Some(query) => {
                let menu = build_menu_for_query(query, &self.catalog, &self.lang);
                match self.menu.as_mut() {
                    Some(controller) => controller.refresh(menu),
                    None => self.menu = Some(MenuController::new(menu)),
                }
            }
        }
        &self.trigger
    }

    /// Routes a key event; `PassThrough` when no menu is open.
    pub fn handle_key(&mut self, key: MenuKey) -> KeyOutcome {
        let Some(controller) = self.menu.as_mut() else {
            return KeyOutcome::PassThrough;
        };

        let outcome = controller.handle_key(key);
        match &outcome {
            KeyOutcome::Commit(item) => self.commit(item),
            KeyOutcome::Cancel => self.cancel(),
            KeyOutcome::Handled | KeyOutcome::PassThrough => {}
        }
        outcome
    }

    pub fn hover(&mut self, index: usize) -> bool {
        self.menu
            .as_mut()
            .is_some_and(|controller| controller.hover(index))
    }

    /// Commits the clicked item; returns it when the click hit one.
    pub fn click(&mut self, index: usize) -> Option<MenuItem> {
        let item = self.menu.as_mut()?.click(index)?;
        self.commit(&item);
        Some(item)
    }

    /// Closes the menu without committing (Escape, outside click, blur).
    pub fn cancel(&mut self) {
        if self.menu.take().is_some() {
            debug!("event=menu_close module=session status=cancelled");
        }
        self.trigger = TriggerState::Idle;
    }

    fn commit(&mut self, item: &MenuItem) {
        let TriggerState::Armed(trigger) = std::mem::take(&mut self.trigger) else {
            return;
        };

        let descriptor = self.catalog.find(&item.key).cloned().unwrap_or_else(|| {
            VariableDescriptor::new(item.key.clone(), item.label.clone(), item.data_source.clone())
                .with_value_type(item.value_type)
        });
        self.document = apply_insertion(&self.document, &trigger, &descriptor, &self.lang);
        self.cursor = trigger.from.min(self.document.content_len()) + 1;
        self.menu = None;
    }
}

#[cfg(test)]
mod tests {
    use super::EditSession;
    use crate::catalog::CatalogSnapshot;
    use crate::menu::{KeyOutcome, MenuKey};
    use crate::model::document::{Document, Inline};
    use crate::model::geometry::Point;
    use crate::model::variable::VariableDescriptor;
    use crate::trigger::TriggerState;

    fn locator(offset: usize) -> Option<Point> {
        Some(Point::new(offset as f32, 16.0))
    }

    fn session() -> EditSession<CatalogSnapshot> {
        let catalog = CatalogSnapshot::new(vec![
            VariableDescriptor::new("total", "Total", "computed"),
            VariableDescriptor::new("client_name", "Client", "client"),
        ]);
        EditSession::new(Document::default(), catalog, "en")
    }

    fn typed(text: &str) -> Document {
        Document::from_paragraph(vec![Inline::text(text)])
    }

    #[test]
    fn typing_a_slash_query_opens_a_filtered_menu() {
        let mut session = session();
        let state = session.on_edit(typed("Hello /cli"), 10, &locator).clone();
        assert_eq!(state.query(), Some("cli"));
        let menu = session.menu().expect("menu should be open");
        assert_eq!(menu.menu().selectable_items.len(), 1);
        assert_eq!(menu.menu().selectable_items[0].key, "client_name");
    }

    #[test]
    fn enter_commits_and_returns_to_idle() {
        let mut session = session();
        session.on_edit(typed("Hello /"), 7, &locator);
        assert_eq!(session.handle_key(MenuKey::ArrowDown), KeyOutcome::Handled);

        let outcome = session.handle_key(MenuKey::Enter);
        assert!(matches!(outcome, KeyOutcome::Commit(ref item) if item.key == "client_name"));
        assert_eq!(session.trigger(), &TriggerState::Idle);
        assert!(session.menu().is_none());
        assert_eq!(session.flat_text(), "Hello {{client_name}}");
        assert_eq!(session.cursor(), 7);
    }

    #[test]
    fn click_commits_regardless_of_keyboard_index() {
        let mut session = session();
        session.on_edit(typed("/"), 1, &locator);
        let item = session.click(0).expect("click hits first item");
        assert_eq!(item.key, "total");
        assert_eq!(session.flat_text(), "{{total}}");
    }

    #[test]
    fn escape_cancels_and_next_edit_recomputes() {
        let mut session = session();
        session.on_edit(typed("a /t"), 4, &locator);
        assert_eq!(session.handle_key(MenuKey::Escape), KeyOutcome::Cancel);
        assert!(session.menu().is_none());
        assert_eq!(session.flat_text(), "a /t");

        session.on_edit(typed("a /to"), 5, &locator);
        assert!(session.trigger().is_armed());
    }

    #[test]
    fn moving_the_cursor_before_the_slash_closes_the_menu() {
        let mut session = session();
        session.on_edit(typed("a /t"), 4, &locator);
        session.on_edit(typed("a /t"), 1, &locator);
        assert!(session.menu().is_none());
        assert_eq!(session.handle_key(MenuKey::Enter), KeyOutcome::PassThrough);
    }
}
