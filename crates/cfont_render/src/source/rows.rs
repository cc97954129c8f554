use image::DynamicImage;

/// Pack one row of pixel levels into an integer, leftmost pixel most significant.
pub fn encode_row(levels: &[u8], bpp: u32) -> u64 {
    levels.iter().fold(0u64, |acc, &level| {
        acc.checked_shl(bpp).unwrap_or(0) | u64::from(level)
    })
}

pub fn encode_grid(grid: &[Vec<u8>], bpp: u32) -> Vec<u64> {
    grid.iter().map(|row| encode_row(row, bpp)).collect()
}

/// Convert an 8-bit intensity to an ink level in `[0, 2^bpp)`.
///
/// Light pixels carry no ink; black is the highest level.
pub fn ink_level(intensity: u8, bpp: u32) -> u8 {
    let max_value = 1u32 << bpp;
    let bucket = (256 / max_value).max(1);
    let level = max_value - u32::from(intensity) / bucket - 1;
    level as u8
}

/// Quantize a decoded raster to per-row ink levels.
pub fn quantize(image: &DynamicImage, bpp: u32) -> Vec<Vec<u8>> {
    let gray = image.to_luma8();
    gray.rows()
        .map(|row| row.map(|pixel| ink_level(pixel.0[0], bpp)).collect())
        .collect()
}
