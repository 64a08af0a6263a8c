//! Inbound description cleanup.

/// Drop every character below U+0020, keeping everything else in order.
///
/// Leading and trailing whitespace other than control characters survives;
/// trimming is not this function's job.
#[must_use]
pub fn sanitize(description: &str) -> String {
    description.chars().filter(|c| u32::from(*c) >= 0x20).collect()
}
