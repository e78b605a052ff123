//! Principal-variation text for the rendering layer.

use crate::moves::move_descriptions::Move;

pub const EMPTY_PRINCIPAL_VARIATION: &str = "No principal variation available yet.";

/// `e2-e4 → e7-e5 → ...`, or a placeholder when the line is empty.
pub fn format_principal_variation(line: &[Move]) -> String {
    if line.is_empty() {
        return EMPTY_PRINCIPAL_VARIATION.to_owned();
    }
    line.iter()
        .map(Move::to_display_notation)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Two-line preview with a depth header; depth 0 means no completed depth.
pub fn principal_variation_preview(line: &[Move], depth: u32) -> String {
    let header = if depth > 0 {
        format!("Depth {depth} principal variation:")
    } else {
        "Principal variation:".to_owned()
    };
    format!("{header}\n{}", format_principal_variation(line))
}
