/// Linear-ish RGB triple in `[0, 1]`, the same layout the GPU records use
pub type Rgb = [f32; 3];

/// Converts a `0xRRGGBB` literal into an RGB triple
pub fn hex_rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
