// Pointer light tracker: where the glow should sit, and whether we're hovered.
// Visual: the three radial glows on the button are centred on `offset`; their
// opacity fades in while `hovered` is true.

use crate::types::{PointerOffset, Rect};

#[derive(Debug, Default)]
pub struct PointerTracker {
    offset: PointerOffset,
    hovered: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the pointer position relative to `bounds`' top-left corner.
    /// Each move overwrites the previous offset; no clamping, no smoothing.
    pub fn on_move(&mut self, pointer: (f32, f32), bounds: Rect) {
        self.offset = PointerOffset {
            x: pointer.0 - bounds.x,
            y: pointer.1 - bounds.y,
        };
    }

    pub fn on_enter(&mut self) {
        self.hovered = true;
    }

    pub fn on_leave(&mut self) {
        self.hovered = false;
    }

    pub fn offset(&self) -> PointerOffset {
        self.offset
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }
}
