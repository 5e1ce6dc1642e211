//! ImageMagick argument rendering for post-processing operations.
//!
//! Every operation runs as `convert <png> <args...> <png>`, rewriting the
//! file in place.

use crate::resolve::PostOp;

/// Arguments placed between the input and output file.
pub fn magick_args(op: &PostOp) -> Vec<String> {
    match op {
        PostOp::Pad { width, height } => vec![
            "-background".into(),
            "none".into(),
            "-gravity".into(),
            "center".into(),
            "-extent".into(),
            format!("{width}x{height}"),
        ],
        PostOp::Background { rrggbb, alpha } => vec![
            "-background".into(),
            format!("#{rrggbb}{alpha}"),
            "-flatten".into(),
        ],
        // Circular mask: unroll to polar space, roll back with transparent
        // corners, keep the original pixels only inside the mask.
        PostOp::Round => [
            "-alpha", "set", "(", "+clone", "-distort", "DePolar", "0",
            "-virtual-pixel", "HorizontalTile", "-background", "None",
            "-distort", "Polar", "0", ")", "-compose", "Dst_In", "-composite",
            "-trim", "+repage",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}
