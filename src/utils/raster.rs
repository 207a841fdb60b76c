use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};

use crate::errors::GenerationError;
use crate::models::qr_code::{QrSymbol, RenderedImage};

/// Quiet zone around the symbol, in modules.
pub const QUIET_ZONE_MODULES: usize = 2;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Scale `symbol` plus its quiet zone onto a `pixel_size` x `pixel_size` canvas.
///
/// Each output pixel samples the module at `floor(p * total / pixel_size)`, so the
/// canvas is always exactly the requested size and module edges round the same way
/// on both axes. Symbols with more modules than pixels are sampled the same way.
pub fn rasterize(symbol: &QrSymbol, pixel_size: u32) -> GrayImage {
    let total = symbol.width + 2 * QUIET_ZONE_MODULES;

    let to_module = |p: u32| -> Option<usize> {
        let cell = p as usize * total / pixel_size as usize;
        cell.checked_sub(QUIET_ZONE_MODULES)
            .filter(|m| *m < symbol.width)
    };

    GrayImage::from_fn(pixel_size, pixel_size, |x, y| {
        match (to_module(x), to_module(y)) {
            (Some(mx), Some(my)) if symbol.is_dark(mx, my) => DARK,
            _ => LIGHT,
        }
    })
}

/// PNG-encode a grayscale raster. No ancillary chunks are written, so equal
/// rasters give equal bytes.
pub fn encode_png(raster: &GrayImage) -> Result<RenderedImage, GenerationError> {
    let (width, height) = raster.dimensions();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(raster.as_raw(), width, height, ExtendedColorType::L8)?;

    Ok(RenderedImage {
        bytes,
        width,
        height,
    })
}
