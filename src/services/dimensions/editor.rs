use serde::Serialize;

use crate::services::dimensions::resolver::{follow_ratio, resolve, MIN_PERCENT};
use crate::services::dimensions::types::{Dimensions, ResizeEdit, ResizeMode, ResizeSpec};

pub const DEFAULT_PERCENT: u32 = 100;
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Editable resize fields backing one resize rule (the global one, or one
/// entry's custom override).
///
/// With `lock_aspect` on, editing one absolute axis recomputes the other
/// from the reference image's natural ratio. Without a reference (global
/// editor over an empty batch) the axes stay independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeEditor {
    reference: Option<Dimensions>,
    mode: ResizeMode,
    width: u32,
    height: u32,
    percent: u32,
    lock_aspect: bool,
}

impl Default for ResizeEditor {
    fn default() -> Self {
        Self {
            reference: None,
            mode: ResizeMode::Percentage,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            percent: DEFAULT_PERCENT,
            lock_aspect: true,
        }
    }
}

impl ResizeEditor {
    /// Editor seeded for a single image: absolute fields start at the
    /// natural size and the natural ratio is the locking ratio.
    pub fn for_image(natural: Dimensions) -> Self {
        Self {
            reference: Some(natural),
            mode: ResizeMode::Percentage,
            width: natural.width.max(1),
            height: natural.height.max(1),
            percent: DEFAULT_PERCENT,
            lock_aspect: true,
        }
    }

    pub fn reference(&self) -> Option<Dimensions> {
        self.reference
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn lock_aspect(&self) -> bool {
        self.lock_aspect
    }

    /// Replace the image whose natural ratio drives aspect locking.
    /// Does not touch the current fields.
    pub fn set_reference(&mut self, reference: Option<Dimensions>) {
        self.reference = reference;
    }

    pub fn set_mode(&mut self, mode: ResizeMode) {
        self.mode = mode;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(1);
        if let Some(natural) = self.locked_reference() {
            self.height = follow_ratio(self.width, natural.width, natural.height);
        }
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height.max(1);
        if let Some(natural) = self.locked_reference() {
            self.width = follow_ratio(self.height, natural.height, natural.width);
        }
    }

    pub fn set_percent(&mut self, percent: u32) {
        self.percent = percent.max(MIN_PERCENT);
    }

    /// Only changes how the next axis edit behaves.
    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.lock_aspect = lock;
    }

    pub fn apply(&mut self, edit: ResizeEdit) {
        match edit {
            ResizeEdit::Mode(mode) => self.set_mode(mode),
            ResizeEdit::Width(width) => self.set_width(width),
            ResizeEdit::Height(height) => self.set_height(height),
            ResizeEdit::Percent(percent) => self.set_percent(percent),
            ResizeEdit::LockAspect(lock) => self.set_lock_aspect(lock),
        }
    }

    pub fn spec(&self) -> ResizeSpec {
        match self.mode {
            ResizeMode::Percentage => ResizeSpec::Percentage {
                percent: self.percent,
            },
            ResizeMode::Absolute => ResizeSpec::Absolute {
                width: self.width,
                height: self.height,
            },
        }
    }

    pub fn resolve_for(&self, natural: Dimensions) -> Dimensions {
        resolve(natural, self.spec())
    }

    fn locked_reference(&self) -> Option<Dimensions> {
        self.reference.filter(|_| self.lock_aspect)
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
