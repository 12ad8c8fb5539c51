use crate::math::{hex_rgb, Rgb};

/// Colors of every part of the procedural bike
///
/// Only `frame` changes between the neutral and emphasized palettes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub frame: Rgb,
    pub tube: Rgb,
    pub bar: Rgb,
    pub trim: Rgb,
    pub tire: Rgb,
    pub rim: Rgb,
    pub spoke: Rgb,
    pub hub: Rgb,
    pub dark: Rgb,
    pub chain: Rgb,
}

impl Palette {
    /// Fixed dark palette used while the pointer is elsewhere
    pub fn neutral() -> Self {
        Self {
            frame: hex_rgb(0x1f2937),
            tube: hex_rgb(0x2d3748),
            bar: hex_rgb(0x1a202c),
            trim: hex_rgb(0x8b5cf6),
            tire: hex_rgb(0x1a202c),
            rim: hex_rgb(0xf59e0b),
            spoke: hex_rgb(0x6b7280),
            hub: hex_rgb(0x374151),
            dark: hex_rgb(0x1f2937),
            chain: hex_rgb(0x4a5568),
        }
    }

    /// Neutral palette with the frame members tinted by `accent`
    pub fn emphasized(accent: Rgb) -> Self {
        Self {
            frame: accent,
            ..Self::neutral()
        }
    }

    pub fn select(emphasized: bool, accent: Rgb) -> Self {
        if emphasized {
            Self::emphasized(accent)
        } else {
            Self::neutral()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_only_touches_frame() {
        let accent = [1.0, 0.0, 0.0];
        let neutral = Palette::neutral();
        let emphasized = Palette::emphasized(accent);

        assert_eq!(emphasized.frame, accent);
        assert_eq!(Palette { frame: neutral.frame, ..emphasized }, neutral);
    }
}
