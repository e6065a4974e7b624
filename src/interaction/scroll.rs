/// Gap left of an item when scrolling it into view.
pub const SCROLL_MARGIN: f32 = 24.0;

/// Header ruler offset, mirrored one way from the scrollable body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSync {
    body_x: f32,
    header_x: f32,
    /// Offset the body should be moved to on the next frame.
    pending_body_x: Option<f32>,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_offset(&self) -> f32 {
        self.body_x
    }

    pub fn header_offset(&self) -> f32 {
        self.header_x
    }

    /// The body reported a scroll; mirror it onto the header.
    pub fn on_body_scroll(&mut self, offset_x: f32) {
        self.body_x = offset_x;
        self.header_x = offset_x;
    }

    /// Scroll so the bar starting at `item_left` sits `SCROLL_MARGIN` from the
    /// left edge. Returns the new body offset.
    pub fn scroll_to_item(&mut self, item_left: f32) -> f32 {
        let target = (item_left - SCROLL_MARGIN).max(0.0);
        let delta = target - self.body_x;
        self.body_x += delta;
        self.header_x = self.body_x;
        self.pending_body_x = Some(self.body_x);
        self.body_x
    }

    /// Take the programmatic body offset requested since the last frame.
    pub fn take_pending(&mut self) -> Option<f32> {
        self.pending_body_x.take()
    }

    /// Forget offsets, e.g. when the window changes.
    pub fn reset(&mut self) {
        *self = Self {
            pending_body_x: Some(0.0),
            ..Self::default()
        };
    }
}
