//! Caret-driven `@mention` and `:emoji:` trigger detection
//!
//! Detection is a pure function of the text run containing the caret and the
//! caret offset, re-run on every text change. Picker placement is computed
//! separately from the caret's bounding box.

mod detect;
mod placement;

pub use detect::{detect, transition, TriggerEvent, TriggerKind, TriggerMatch};
pub use placement::{place_picker, Placement, Rect, PICKER_GAP};
