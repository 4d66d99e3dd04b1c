//! Trigger span detection
//!
//! Grammar, applied to the text run up to the caret:
//!
//! ```text
//! boundary := start-of-run | whitespace
//! mention  := boundary '@' { any char except whitespace and ']' }
//! emoji    := boundary ':' { 'a'..='z' | '0'..='9' | '_' }
//! ```
//!
//! Both productions must extend exactly to the caret. Offsets are character
//! offsets into the run.

/// Which picker a trigger opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Mention,
    Emoji,
}

impl TriggerKind {
    pub fn trigger_char(self) -> char {
        match self {
            TriggerKind::Mention => '@',
            TriggerKind::Emoji => ':',
        }
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '@' => Some(TriggerKind::Mention),
            ':' => Some(TriggerKind::Emoji),
            _ => None,
        }
    }

    fn accepts(self, ch: char) -> bool {
        match self {
            TriggerKind::Mention => !ch.is_whitespace() && ch != ']',
            TriggerKind::Emoji => matches!(ch, 'a'..='z' | '0'..='9' | '_'),
        }
    }
}

/// The span to replace when a picker entry is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub kind: TriggerKind,
    /// Text between the trigger character and the caret
    pub query: String,
    /// Offset of the trigger character
    pub start_offset: usize,
    /// Caret offset (exclusive end of the span)
    pub end_offset: usize,
}

impl TriggerMatch {
    pub fn trigger_char(&self) -> char {
        self.kind.trigger_char()
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find the trigger span ending at `caret` in `run`.
///
/// A caret past the end of the run is treated as being at the end.
pub fn detect(run: &str, caret: usize) -> Option<TriggerMatch> {
    let before: Vec<char> = run.chars().take(caret).collect();
    let caret = before.len();

    // The candidate word starts after the last whitespace before the caret
    let word_start = before
        .iter()
        .rposition(|c| c.is_whitespace())
        .map_or(0, |i| i + 1);
    let word = &before[word_start..];

    let (&first, rest) = word.split_first()?;
    let kind = TriggerKind::from_char(first)?;
    if !rest.iter().all(|&c| kind.accepts(c)) {
        return None;
    }

    Some(TriggerMatch {
        kind,
        query: rest.iter().collect(),
        start_offset: word_start,
        end_offset: caret,
    })
}

/// What the caller should do with the picker after a text change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A new trigger appeared
    Open(TriggerMatch),
    /// The open trigger's query changed
    Update(TriggerMatch),
    /// The open trigger no longer matches; dismiss the picker
    Close,
    /// Nothing open, nothing matched
    Idle,
}

/// Re-evaluate detection against the previously open trigger, if any
pub fn transition(previous: Option<&TriggerMatch>, run: &str, caret: usize) -> TriggerEvent {
    match (previous, detect(run, caret)) {
        (Some(prev), Some(current))
            if prev.kind == current.kind && prev.start_offset == current.start_offset =>
        {
            TriggerEvent::Update(current)
        }
        (_, Some(current)) => TriggerEvent::Open(current),
        (Some(_), None) => TriggerEvent::Close,
        (None, None) => TriggerEvent::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(run: &str, caret: usize) -> Option<(TriggerKind, String)> {
        detect(run, caret).map(|m| (m.kind, m.query))
    }

    #[test]
    fn test_emoji_after_space() {
        let m = detect("hello :sm", 9).unwrap();
        assert_eq!(m.kind, TriggerKind::Emoji);
        assert_eq!(m.query, "sm");
        assert_eq!(m.start_offset, 6);
        assert_eq!(m.end_offset, 9);
    }

    #[test]
    fn test_emoji_requires_boundary() {
        assert_eq!(query("hello:sm", 8), None);
    }

    #[test]
    fn test_mention_requires_boundary() {
        assert_eq!(query("a@b", 3), None);
        assert_eq!(
            query("@b", 2),
            Some((TriggerKind::Mention, "b".to_string()))
        );
    }

    #[test]
    fn test_bare_trigger_has_empty_query() {
        let m = detect("say @", 5).unwrap();
        assert_eq!(m.query, "");
        assert_eq!(m.len(), 1);
        assert_eq!(query(":", 1), Some((TriggerKind::Emoji, String::new())));
    }

    #[test]
    fn test_emoji_charset() {
        assert_eq!(
            query(":thumbs_up2", 11),
            Some((TriggerKind::Emoji, "thumbs_up2".to_string()))
        );
        assert_eq!(query(":Smile", 6), None);
        assert_eq!(query(":+1", 3), None);
    }

    #[test]
    fn test_mention_charset() {
        assert_eq!(
            query("hi @jane.doe-99", 15),
            Some((TriggerKind::Mention, "jane.doe-99".to_string()))
        );
        assert_eq!(
            query("@İstanbul", 9),
            Some((TriggerKind::Mention, "İstanbul".to_string()))
        );
        assert_eq!(query("@a]b", 4), None);
    }

    #[test]
    fn test_caret_in_middle_of_run() {
        // Only text before the caret is considered
        let m = detect("hey @al and more", 7).unwrap();
        assert_eq!(m.query, "al");
        assert_eq!(m.end_offset, 7);
        assert_eq!(query("hey @al and more", 12), None);
    }

    #[test]
    fn test_caret_past_end_clamps() {
        let m = detect(":ok", 99).unwrap();
        assert_eq!(m.end_offset, 3);
    }

    #[test]
    fn test_offsets_are_chars() {
        let m = detect("héllo 👋 :wa", 11).unwrap();
        assert_eq!(m.start_offset, 8);
        assert_eq!(m.query, "wa");
    }

    #[test]
    fn test_other_whitespace_is_boundary() {
        assert!(detect("line\n@x", 7).is_some());
        assert!(detect("tab\t:x", 6).is_some());
    }

    #[test]
    fn test_transition_lifecycle() {
        let TriggerEvent::Open(m) = transition(None, "hi :s", 5) else {
            panic!("expected the picker to open");
        };

        let updated = transition(Some(&m), "hi :sm", 6);
        assert!(matches!(&updated, TriggerEvent::Update(u) if u.query == "sm"));

        // Typing a space closes the picker
        assert_eq!(transition(Some(&m), "hi :sm ", 7), TriggerEvent::Close);
        // Deleting the trigger closes it too
        assert_eq!(transition(Some(&m), "hi ", 3), TriggerEvent::Close);
        assert_eq!(transition(None, "hi", 2), TriggerEvent::Idle);
    }

    #[test]
    fn test_transition_new_trigger_reopens() {
        let m = detect("@a", 2).unwrap();
        assert!(matches!(
            transition(Some(&m), "@a :x", 5),
            TriggerEvent::Open(_)
        ));
    }
}
