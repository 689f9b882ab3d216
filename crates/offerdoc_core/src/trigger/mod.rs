//! Slash-command trigger detection.
//!
//! # Responsibility
//! - Derive the trigger state for one edit from the cursor offset and the
//!   bounded text window preceding it.
//!
//! # Invariants
//! - Detection is stateless across calls: every edit recomputes the state
//!   from scratch, so there is no cancellation path to maintain.
//! - Cost per call is bounded by the window width, not document length.
//! - Detection never fails; every invalid condition yields `Idle`.
//!
//! # See also
//! - docs/architecture/template-content.md

use crate::model::geometry::Point;
use log::debug;
use serde::{Deserialize, Serialize};

/// Character that opens a slash command.
pub const TRIGGER_CHAR: char = '/';
/// Default width of the preceding-text window in characters.
pub const DEFAULT_WINDOW_CHARS: usize = 50;
/// Default maximum query length in characters.
pub const DEFAULT_MAX_QUERY_CHARS: usize = 30;

/// Resolves an editor offset to on-screen coordinates.
///
/// Provided by the editing surface; `None` when the offset cannot be laid
/// out (detached view, offset scrolled out of the render tree, ...).
pub trait CursorLocator {
    fn locate_cursor(&self, offset: usize) -> Option<Point>;
}

impl<F> CursorLocator for F
where
    F: Fn(usize) -> Option<Point>,
{
    fn locate_cursor(&self, offset: usize) -> Option<Point> {
        self(offset)
    }
}

/// In-progress slash command: `[from, to)` covers the `/` and the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmedTrigger {
    pub from: usize,
    pub to: usize,
    pub query: String,
    pub anchor: Point,
}

/// Trigger state owned by one editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TriggerState {
    #[default]
    Idle,
    Armed(ArmedTrigger),
}

impl TriggerState {
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }

    pub fn armed(&self) -> Option<&ArmedTrigger> {
        match self {
            Self::Armed(trigger) => Some(trigger),
            Self::Idle => None,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.armed().map(|trigger| trigger.query.as_str())
    }
}

/// Limits applied by [`TriggerDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub window_chars: usize,
    pub max_query_chars: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            window_chars: DEFAULT_WINDOW_CHARS,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
        }
    }
}

/// Stateless trigger detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerDetector {
    config: TriggerConfig,
}

impl TriggerDetector {
    pub fn new(config: TriggerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TriggerConfig {
        self.config
    }

    /// Computes the trigger state for the text window ending at `cursor`.
    ///
    /// Only the last `window_chars` characters of `window` are inspected.
    pub fn detect(
        &self,
        cursor: usize,
        window: &str,
        locator: &dyn CursorLocator,
    ) -> TriggerState {
        let mut chars: Vec<char> = window.chars().rev().take(self.config.window_chars).collect();
        chars.reverse();

        let Some(slash) = chars.iter().rposition(|ch| *ch == TRIGGER_CHAR) else {
            return TriggerState::Idle;
        };

        let query_chars = &chars[slash + 1..];
        if query_chars.len() > self.config.max_query_chars {
            return TriggerState::Idle;
        }

        // Slash must open a word: start of window, after a space or a newline.
        let at_word_start = slash == 0 || matches!(chars[slash - 1], ' ' | '\n');
        if !at_word_start {
            return TriggerState::Idle;
        }

        let Some(from) = cursor.checked_sub(chars.len() - slash) else {
            debug!(
                "event=trigger_detect module=trigger status=skipped reason=window_exceeds_cursor cursor={} window_chars={}",
                cursor,
                chars.len()
            );
            return TriggerState::Idle;
        };

        let Some(anchor) = locator.locate_cursor(cursor) else {
            debug!(
                "event=trigger_detect module=trigger status=skipped reason=cursor_unresolved cursor={}",
                cursor
            );
            return TriggerState::Idle;
        };

        TriggerState::Armed(ArmedTrigger {
            from,
            to: cursor,
            query: query_chars.iter().collect(),
            anchor,
        })
    }
}

/// Detects a trigger with the default window and query limits.
pub fn detect_trigger(cursor: usize, window: &str, locator: &dyn CursorLocator) -> TriggerState {
    TriggerDetector::default().detect(cursor, window, locator)
}
