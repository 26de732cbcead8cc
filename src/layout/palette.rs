//! Display colors, grouped by semantic role.

use serde::Serialize;

/// Opaque RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS-style hex string, e.g. `#8ecae6`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// One color per role; blocks with the same role share the same color.
pub const PLACEHOLDER: Color = Color::rgb(0x9a, 0xa0, 0xa6);
pub const EMBEDDING: Color = Color::rgb(0xf4, 0xa2, 0x61);
pub const POSITIONAL: Color = Color::rgb(0xe9, 0xc4, 0x6a);
pub const ATTENTION: Color = Color::rgb(0x2a, 0x9d, 0x8f);
pub const RESIDUAL_NORM: Color = Color::rgb(0x8e, 0xca, 0xe6);
pub const FEED_FORWARD: Color = Color::rgb(0x26, 0x46, 0x53);
pub const LINEAR: Color = Color::rgb(0xb5, 0x83, 0x8d);
pub const SOFTMAX: Color = Color::rgb(0xe7, 0x6f, 0x51);
pub const OUTPUT: Color = Color::rgb(0x9a, 0xa0, 0xa6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::rgb(0x8e, 0xca, 0xe6).to_hex(), "#8ecae6");
        assert_eq!(Color::rgb(0, 0, 0).to_hex(), "#000000");
    }
}
