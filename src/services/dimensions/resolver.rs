use crate::services::dimensions::types::{Dimensions, ResizeSpec};

/// Smallest percentage a `Percentage` rule may carry.
pub const MIN_PERCENT: u32 = 1;

/// Compute the target size of an image with natural size `natural` under `spec`.
///
/// Percentages scale both axes by the same factor and round half away from
/// zero. Every axis is clamped to at least 1 pixel.
pub fn resolve(natural: Dimensions, spec: ResizeSpec) -> Dimensions {
    match spec {
        ResizeSpec::Percentage { percent } => {
            let percent = percent.max(MIN_PERCENT);
            Dimensions::new(
                scale_axis(natural.width, percent),
                scale_axis(natural.height, percent),
            )
        }
        ResizeSpec::Absolute { width, height } => Dimensions::new(width.max(1), height.max(1)),
    }
}

/// `round(value * percent / 100)`, at least 1.
fn scale_axis(value: u32, percent: u32) -> u32 {
    let scaled = (u64::from(value) * u64::from(percent) + 50) / 100;
    clamp_axis(scaled)
}

/// Companion axis for an aspect-locked edit:
/// `round(edited * other_natural / edited_natural)`, at least 1.
///
/// Always computed from the natural ratio so repeated edits cannot drift.
pub fn follow_ratio(edited: u32, edited_natural: u32, other_natural: u32) -> u32 {
    let numerator = u128::from(edited) * u128::from(other_natural);
    let denominator = u128::from(edited_natural.max(1));
    clamp_axis((2 * numerator + denominator) / (2 * denominator))
}

fn clamp_axis(value: impl Into<u128>) -> u32 {
    value.into().clamp(1, u128::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
