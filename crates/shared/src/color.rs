use std::fmt;

/// Channel multiplier for the inner circle of two-tone markers.
pub const SHADE_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Multiply every channel by `factor` and floor.
    pub fn darken(self, factor: f64) -> Self {
        let shade = |c: u8| (c as f64 * factor).floor().clamp(0.0, 255.0) as u8;
        Self::new(shade(self.r), shade(self.g), shade(self.b))
    }

    /// The darker companion used for the inner circle of a marker.
    pub fn shaded(self) -> Self {
        self.darken(SHADE_FACTOR)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// --- Period palette ---

pub const ANCIENT_EGYPTIAN: Rgb = Rgb::new(0xd4, 0xa0, 0x17);
pub const PTOLEMAIC: Rgb = Rgb::new(0x7b, 0x4f, 0xa0);
pub const ROMAN: Rgb = Rgb::new(0xb2, 0x22, 0x22);
pub const BYZANTINE: Rgb = Rgb::new(0x2e, 0x5e, 0xaa);
pub const ISLAMIC: Rgb = Rgb::new(0x2e, 0x8b, 0x57);
pub const FALLBACK_GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// Canonical period labels, in chronological order.
pub const PERIODS: [(&str, Rgb); 5] = [
    ("Ancient Egyptian", ANCIENT_EGYPTIAN),
    ("Ptolemaic", PTOLEMAIC),
    ("Roman", ROMAN),
    ("Byzantine", BYZANTINE),
    ("Islamic", ISLAMIC),
];

/// Marker color for a period label. Matching is exact and case-sensitive
/// against the data layer's canonical labels.
pub fn resolve_color(period: &str) -> Rgb {
    PERIODS
        .iter()
        .find(|(label, _)| *label == period)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_GRAY)
}
