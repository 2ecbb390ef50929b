use serde::{Deserialize, Serialize};

/// Colours handed out to new classes, in order
pub const PALETTE: [&str; 10] = [
    "#4ade80", "#60d5f5", "#f59e0b", "#a78bfa", "#fb923c", "#f472b6", "#34d399", "#fbbf24",
    "#818cf8", "#fb7185",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTag {
    pub name: String,
    pub color: String,
}

impl ClassTag {
    pub fn new(name: String, color: String) -> Self {
        Self { name, color }
    }

    /// Parse the colour as `#rrggbb` for terminal tinting.
    /// The stored colour is never validated, so this may fail.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}
