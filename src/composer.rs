//! Composer session
//!
//! Wires the pieces together for one open composer: text edits run the
//! shortcut transformers and the trigger detector, the picker is fed from
//! search or the frequently used list, and a chosen entry replaces the
//! trigger span in the document.
//!
//! ```text
//! edit() ──▶ Pipeline::shortcut ──▶ Document::replace_span
//!    └─────▶ trigger::transition ──▶ TriggerEvent
//!
//! emoji_suggestions() ──▶ search() | FrequencyStore::list()
//! select_emoji() / select_mention() ──▶ replace_span + FrequencyStore::record
//! ```

use std::sync::Arc;

use crate::config::ComposerConfig;
use crate::document::{
    Document, DocumentError, EditorNode, InlineMediaNode, MentionUser, NodePosition,
};
use crate::emoji::{
    search, DataMapResolver, EmojiDataMap, EmojiRecord, EmojiResolver, FrequencyStore,
};
use crate::markdown::Pipeline;
use crate::trigger::{transition, TriggerEvent, TriggerKind, TriggerMatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    Document(DocumentError),
    /// No picker is open
    NoActiveTrigger,
    /// The open picker is for a different trigger
    WrongTrigger {
        expected: TriggerKind,
        found: TriggerKind,
    },
    UnknownEmoji(String),
}

impl std::fmt::Display for ComposerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComposerError::Document(e) => write!(f, "{}", e),
            ComposerError::NoActiveTrigger => write!(f, "No picker is open"),
            ComposerError::WrongTrigger { expected, found } => write!(
                f,
                "Expected a {:?} picker but a {:?} picker is open",
                expected, found
            ),
            ComposerError::UnknownEmoji(id) => write!(f, "Unknown emoji: {}", id),
        }
    }
}

impl std::error::Error for ComposerError {}

impl From<DocumentError> for ComposerError {
    fn from(e: DocumentError) -> Self {
        ComposerError::Document(e)
    }
}

/// Open trigger and the text run it lives in
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveTrigger {
    run: usize,
    matched: TriggerMatch,
}

pub struct Composer {
    document: Document,
    pipeline: Pipeline,
    data: Arc<EmojiDataMap>,
    resolver: Arc<DataMapResolver>,
    frequency: FrequencyStore,
    active: Option<ActiveTrigger>,
    max_results: usize,
    max_frequent_rows: usize,
    per_line: usize,
}

impl Composer {
    pub fn new(data: Arc<EmojiDataMap>, frequency: FrequencyStore, config: &ComposerConfig) -> Self {
        let resolver = Arc::new(
            DataMapResolver::new(Arc::clone(&data), config.emoji_set.clone())
                .with_url_template(config.image_url.clone()),
        );
        let pipeline = Pipeline::new(resolver.clone());

        Self {
            document: Document::new(),
            pipeline,
            data,
            resolver,
            frequency,
            active: None,
            max_results: config.max_results,
            max_frequent_rows: config.max_frequent_rows,
            per_line: config.per_line,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn data(&self) -> &EmojiDataMap {
        &self.data
    }

    pub fn frequency(&self) -> &FrequencyStore {
        &self.frequency
    }

    pub fn frequency_mut(&mut self) -> &mut FrequencyStore {
        &mut self.frequency
    }

    /// Replace the document with imported Markdown. Closes any open picker.
    pub fn load_markdown(&mut self, markdown: &str) {
        self.document = self.pipeline.import_document(markdown);
        self.active = None;
    }

    pub fn to_markdown(&self) -> String {
        self.pipeline.export_document(&self.document)
    }

    /// Currently open trigger, if any
    pub fn active_trigger(&self) -> Option<&TriggerMatch> {
        self.active.as_ref().map(|a| &a.matched)
    }

    /// The user changed text run `run` to `content`, leaving the caret at `caret`.
    ///
    /// A completed Markdown construct before the caret is converted into its
    /// node first, which always closes the picker.
    pub fn edit(
        &mut self,
        run: usize,
        content: &str,
        caret: usize,
    ) -> Result<TriggerEvent, ComposerError> {
        self.document.set_text(run, content)?;
        if content.is_empty() {
            // The run is gone along with any trigger in it
            return Ok(self.close_active());
        }

        if let Some(shortcut) = self.pipeline.shortcut(content, caret) {
            tracing::debug!(
                "Shortcut converted {}..{} into a {} node",
                shortcut.start,
                shortcut.end,
                shortcut.node.kind_name()
            );
            self.document
                .replace_span(run, shortcut.start, shortcut.end, shortcut.node)?;
            return Ok(self.close_active());
        }

        self.caret_moved(run, caret)
    }

    /// Re-run trigger detection for a caret in text run `run`
    pub fn caret_moved(&mut self, run: usize, caret: usize) -> Result<TriggerEvent, ComposerError> {
        let text = match self.document.text_run(run) {
            Ok(text) => text,
            // Caret next to a mention or image: nothing to detect
            Err(DocumentError::NotText(_)) => "",
            Err(e) => return Err(e.into()),
        };

        let previous = self
            .active
            .as_ref()
            .filter(|a| a.run == run)
            .map(|a| &a.matched);
        let mut event = transition(previous, text, caret);

        // An open trigger in another run closes when the caret leaves it
        if previous.is_none() && self.active.is_some() && event == TriggerEvent::Idle {
            event = TriggerEvent::Close;
        }

        match &event {
            TriggerEvent::Open(matched) | TriggerEvent::Update(matched) => {
                self.active = Some(ActiveTrigger {
                    run,
                    matched: matched.clone(),
                });
            }
            TriggerEvent::Close | TriggerEvent::Idle => self.active = None,
        }
        Ok(event)
    }

    /// Close the picker without inserting anything
    pub fn dismiss(&mut self) {
        self.active = None;
    }

    fn close_active(&mut self) -> TriggerEvent {
        match self.active.take() {
            Some(_) => TriggerEvent::Close,
            None => TriggerEvent::Idle,
        }
    }

    /// Entries for the open emoji picker.
    ///
    /// An empty query shows the frequently used list; otherwise search results.
    pub fn emoji_suggestions(&mut self) -> Vec<&EmojiRecord> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        if active.matched.kind != TriggerKind::Emoji {
            return Vec::new();
        }

        if active.matched.query.is_empty() {
            let ids = self.frequency.list(self.max_frequent_rows, self.per_line);
            return ids.iter().filter_map(|id| self.data.get(id)).collect();
        }

        search(&self.data, &active.matched.query, self.max_results)
    }

    /// Frequently used emoji records, most used first
    pub fn frequent(&mut self) -> Vec<&EmojiRecord> {
        let ids = self.frequency.list(self.max_frequent_rows, self.per_line);
        ids.iter().filter_map(|id| self.data.get(id)).collect()
    }

    /// Replace the open emoji trigger with emoji `id` and count the use.
    ///
    /// Native emoji are inserted as text in the preferred skin tone; custom
    /// emoji become inline media nodes. On error the trigger stays open.
    pub fn select_emoji(&mut self, id: &str) -> Result<NodePosition, ComposerError> {
        let active = self.open_trigger(TriggerKind::Emoji)?;

        let record = self
            .data
            .get(id)
            .ok_or_else(|| ComposerError::UnknownEmoji(id.to_string()))?;
        let node = self.emoji_node(record)?;
        let canonical = record.id.clone();

        let caret = self.replace_trigger(active, node)?;
        self.frequency.record(&canonical);
        tracing::debug!("Inserted emoji {}", canonical);
        Ok(caret)
    }

    /// Replace the open mention trigger with a mention of `user`
    pub fn select_mention(&mut self, user: MentionUser) -> Result<NodePosition, ComposerError> {
        let active = self.open_trigger(TriggerKind::Mention)?;
        let username = user.username.clone();
        let caret = self.replace_trigger(active, EditorNode::mention(user))?;
        tracing::debug!("Inserted mention of {}", username);
        Ok(caret)
    }

    fn emoji_node(&self, record: &EmojiRecord) -> Result<EditorNode, ComposerError> {
        if let Some(native) = record.native_for_tone(self.frequency.skin_tone()) {
            return Ok(EditorNode::text(native));
        }

        let resolved = self
            .resolver
            .resolve(&record.id)
            .ok_or_else(|| ComposerError::UnknownEmoji(record.id.clone()))?;
        Ok(InlineMediaNode::emoji(record.bare_shortcode(), resolved).into())
    }

    fn open_trigger(&self, expected: TriggerKind) -> Result<ActiveTrigger, ComposerError> {
        let active = self.active.as_ref().ok_or(ComposerError::NoActiveTrigger)?;
        if active.matched.kind != expected {
            return Err(ComposerError::WrongTrigger {
                expected,
                found: active.matched.kind,
            });
        }
        Ok(active.clone())
    }

    /// Swap the trigger span for `node`; the trigger closes only on success
    fn replace_trigger(
        &mut self,
        active: ActiveTrigger,
        node: EditorNode,
    ) -> Result<NodePosition, ComposerError> {
        let caret = self.document.replace_span(
            active.run,
            active.matched.start_offset,
            active.matched.end_offset,
            node,
        )?;
        self.active = None;
        Ok(caret)
    }
}
