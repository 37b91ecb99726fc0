//! Grey-level image treatments applied before individual recognition passes.
//!
//! All operators take and return 8-bit greyscale buffers; [`apply`] is the
//! entry point used by the pass runner.

use super::types::Preprocessing;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{self, ThresholdType};
use imageproc::{filter, map};

/// Neighbourhood size of the adaptive threshold (pixels, odd).
pub const ADAPTIVE_BLOCK_SIZE: u32 = 11;
/// Constant subtracted from the weighted local mean.
pub const ADAPTIVE_OFFSET: i16 = 2;
/// Histogram clip factor for contrast-limited equalisation.
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;
/// Tiles per axis for contrast-limited equalisation.
pub const CLAHE_TILES: u32 = 8;

/// Produce the image a pass should see.
pub fn apply(preprocessing: Preprocessing, image: &DynamicImage) -> DynamicImage {
    match preprocessing {
        Preprocessing::Original => image.clone(),
        Preprocessing::AdaptiveThreshold => {
            DynamicImage::ImageLuma8(adaptive_threshold(&image.to_luma8(), ADAPTIVE_BLOCK_SIZE, ADAPTIVE_OFFSET))
        }
        Preprocessing::Otsu => DynamicImage::ImageLuma8(otsu(&image.to_luma8())),
        Preprocessing::ContrastDenoise => {
            let equalized = clahe(&image.to_luma8(), CLAHE_CLIP_LIMIT, CLAHE_TILES);
            DynamicImage::ImageLuma8(median3(&equalized))
        }
    }
}

/// Gaussian-weighted local threshold: a pixel turns white when it is brighter
/// than its weighted neighbourhood mean minus `offset`.
pub fn adaptive_threshold(gray: &GrayImage, block_size: u32, offset: i16) -> GrayImage {
    // Kernel sigma for a given block size, as derived for OpenCV's GaussianBlur.
    let sigma = 0.3 * ((block_size.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let local_mean = filter::gaussian_blur_f32(gray, sigma);

    map::map_colors2(gray, &local_mean, |pixel: Luma<u8>, mean: Luma<u8>| {
        let threshold = mean.0[0] as i16 - offset;
        Luma([if pixel.0[0] as i16 > threshold { 255 } else { 0 }])
    })
}

/// Global Otsu binarisation.
pub fn otsu(gray: &GrayImage) -> GrayImage {
    let level = contrast::otsu_level(gray);
    contrast::threshold(gray, level, ThresholdType::Binary)
}

/// Contrast-limited adaptive histogram equalisation with bilinear blending
/// between tile mappings. imageproc only offers global equalisation.
pub fn clahe(gray: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let tile_w = width.div_ceil(tiles.max(1)).max(1);
    let tile_h = height.div_ceil(tiles.max(1)).max(1);
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts.push(tile_mapping(gray, (x0, y0, x1, y1), clip_limit));
        }
    }

    let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];

    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = pixel.0[0] as usize;

        let fx = ((x as f32 + 0.5) / tile_w as f32 - 0.5).clamp(0.0, (tiles_x - 1) as f32);
        let fy = ((y as f32 + 0.5) / tile_h as f32 - 0.5).clamp(0.0, (tiles_y - 1) as f32);
        let (tx0, ty0) = (fx.floor() as u32, fy.floor() as u32);
        let (tx1, ty1) = ((tx0 + 1).min(tiles_x - 1), (ty0 + 1).min(tiles_y - 1));
        let (ax, ay) = (fx - tx0 as f32, fy - ty0 as f32);

        let top = lut_at(tx0, ty0)[value] as f32 * (1.0 - ax) + lut_at(tx1, ty0)[value] as f32 * ax;
        let bottom = lut_at(tx0, ty1)[value] as f32 * (1.0 - ax) + lut_at(tx1, ty1)[value] as f32 * ax;
        let blended = top * (1.0 - ay) + bottom * ay;

        out.put_pixel(x, y, Luma([blended.round().clamp(0.0, 255.0) as u8]));
    }
    out
}

fn tile_mapping(gray: &GrayImage, (x0, y0, x1, y1): (u32, u32, u32, u32), clip_limit: f32) -> [u8; 256] {
    let mut histogram = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[gray.get_pixel(x, y).0[0] as usize] += 1;
        }
    }

    let pixels = ((x1 - x0) * (y1 - y0)).max(1);
    let limit = ((clip_limit * pixels as f32 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for bin in histogram.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let share = excess / 256;
    for bin in histogram.iter_mut() {
        *bin += share;
    }
    // leftover counts are spread evenly across the range, not piled at the bottom
    let remainder = (excess % 256) as usize;
    if remainder > 0 {
        let step = (256 / remainder).max(1);
        for bin in histogram.iter_mut().step_by(step).take(remainder) {
            *bin += 1;
        }
    }

    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (i, &count) in histogram.iter().enumerate() {
        cumulative += count;
        lut[i] = ((cumulative as f32 * 255.0 / pixels as f32).round()).min(255.0) as u8;
    }
    lut
}

/// 3x3 median filter.
pub fn median3(gray: &GrayImage) -> GrayImage {
    filter::median_filter(gray, 1, 1)
}
