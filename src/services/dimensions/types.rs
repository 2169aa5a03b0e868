use serde::{Deserialize, Serialize};

/// Width/height pair in pixels. Both axes are positive once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which of the two resize rules an editor is currently producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeMode {
    Percentage,
    Absolute,
}

/// A resize rule. Aspect locking is not part of the rule: only the
/// resulting width/height are stored for `Absolute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum ResizeSpec {
    /// Scale both axes by `percent / 100`. `percent >= 1`.
    Percentage { percent: u32 },
    /// Use `width`/`height` directly. Both `>= 1`.
    Absolute { width: u32, height: u32 },
}

impl ResizeSpec {
    pub fn mode(&self) -> ResizeMode {
        match self {
            ResizeSpec::Percentage { .. } => ResizeMode::Percentage,
            ResizeSpec::Absolute { .. } => ResizeMode::Absolute,
        }
    }
}

/// One field edit against a [`ResizeEditor`](super::ResizeEditor), as sent by
/// the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "value")]
pub enum ResizeEdit {
    Mode(ResizeMode),
    Width(u32),
    Height(u32),
    Percent(u32),
    LockAspect(bool),
}

impl ResizeEdit {
    /// Lock toggles only affect the next axis edit.
    pub fn changes_spec(&self) -> bool {
        !matches!(self, ResizeEdit::LockAspect(_))
    }
}
