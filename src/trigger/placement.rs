//! Picker placement relative to the caret
//!
//! Pure geometry, kept apart from detection. Coordinates are logical pixels
//! with the origin at the top-left of the viewport.

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Where the picker goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// Picker opens above the caret because there was no room below
    pub above: bool,
}

/// Gap between the caret box and the picker
pub const PICKER_GAP: f32 = 4.0;

/// Place a `width`×`height` picker under the caret's bounding box.
///
/// Flips above the caret when it would overflow the bottom of the viewport and
/// there is more room above. Horizontally it is clamped inside the viewport.
pub fn place_picker(caret: Rect, width: f32, height: f32, viewport: Rect) -> Placement {
    let below_y = caret.bottom() + PICKER_GAP;
    let room_below = viewport.bottom() - below_y;
    let room_above = caret.y - PICKER_GAP - viewport.y;

    let above = room_below < height && room_above > room_below;
    let y = if above {
        (caret.y - PICKER_GAP - height).max(viewport.y)
    } else {
        below_y
    };

    let max_x = (viewport.right() - width).max(viewport.x);
    let x = caret.x.clamp(viewport.x, max_x);

    Placement { x, y, above }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_below_caret_by_default() {
        let caret = Rect::new(100.0, 50.0, 2.0, 20.0);
        let p = place_picker(caret, 300.0, 200.0, viewport());
        assert!(!p.above);
        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 74.0);
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let caret = Rect::new(100.0, 550.0, 2.0, 20.0);
        let p = place_picker(caret, 300.0, 200.0, viewport());
        assert!(p.above);
        assert_eq!(p.y, 346.0);
    }

    #[test]
    fn test_clamped_horizontally() {
        let caret = Rect::new(700.0, 50.0, 2.0, 20.0);
        let p = place_picker(caret, 300.0, 200.0, viewport());
        assert_eq!(p.x, 500.0);
    }

    #[test]
    fn test_picker_wider_than_viewport() {
        let caret = Rect::new(10.0, 10.0, 2.0, 20.0);
        let p = place_picker(caret, 1000.0, 100.0, viewport());
        assert_eq!(p.x, 0.0);
    }
}
