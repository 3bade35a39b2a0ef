use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    Horizontal,
    #[default]
    Vertical,
}

/// Scroll position of a viewport over a larger content area, in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        self.content_w = w;
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.x = self.x.min(self.max_offset(ScrollAxis::Horizontal));
        self.y = self.y.min(self.max_offset(ScrollAxis::Vertical));
    }

    pub fn offset(&self, axis: ScrollAxis) -> u32 {
        match axis {
            ScrollAxis::Horizontal => self.x,
            ScrollAxis::Vertical => self.y,
        }
    }

    pub fn visible(&self, axis: ScrollAxis) -> u32 {
        match axis {
            ScrollAxis::Horizontal => self.viewport_w as u32,
            ScrollAxis::Vertical => self.viewport_h as u32,
        }
    }

    pub fn total(&self, axis: ScrollAxis) -> u32 {
        match axis {
            ScrollAxis::Horizontal => self.content_w,
            ScrollAxis::Vertical => self.content_h,
        }
    }

    /// Cells left to scroll past the end of the viewport.
    pub fn remaining(&self, axis: ScrollAxis) -> u32 {
        self.total(axis)
            .saturating_sub(self.visible(axis).saturating_add(self.offset(axis)))
    }

    pub fn scroll_by(&mut self, axis: ScrollAxis, delta: i32) {
        let next = (self.offset(axis) as i64 + delta as i64).clamp(0, self.max_offset(axis) as i64);
        self.set_offset(axis, next as u32);
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.scroll_by(ScrollAxis::Vertical, delta);
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_offset(ScrollAxis::Vertical);
    }

    fn set_offset(&mut self, axis: ScrollAxis, offset: u32) {
        match axis {
            ScrollAxis::Horizontal => self.x = offset,
            ScrollAxis::Vertical => self.y = offset,
        }
    }

    fn max_offset(&self, axis: ScrollAxis) -> u32 {
        self.total(axis).saturating_sub(self.visible(axis))
    }
}
