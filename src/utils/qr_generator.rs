use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::errors::GenerationError;
use crate::models::qr_code::{ErrorCorrection, RenderedImage};
use crate::structs::qr_request::ValidatedRequest;
use crate::utils::encoder::{ByteModeEncoder, SymbolEncoder};
use crate::utils::raster::{encode_png, rasterize};

/// Encode/render pipeline. Holds no per-request state and can be shared across workers.
#[derive(Clone)]
pub struct QrGenerator {
    encoder: Arc<dyn SymbolEncoder + Send + Sync>,
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self::new(Arc::new(ByteModeEncoder))
    }
}

impl QrGenerator {
    pub const ERROR_CORRECTION: ErrorCorrection = ErrorCorrection::Medium;

    pub fn new(encoder: Arc<dyn SymbolEncoder + Send + Sync>) -> Self {
        Self { encoder }
    }

    /// Encode the request's text and render it as a PNG of the requested size.
    pub fn generate(&self, request: &ValidatedRequest) -> Result<RenderedImage, GenerationError> {
        // A panicking encoder must not take the worker down with it
        catch_unwind(AssertUnwindSafe(|| self.render(request))).unwrap_or_else(|panic| {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(GenerationError::Panicked(reason))
        })
    }

    fn render(&self, request: &ValidatedRequest) -> Result<RenderedImage, GenerationError> {
        let symbol = self.encoder.encode(request.text(), Self::ERROR_CORRECTION)?;
        log::debug!(
            "Rendering version {} symbol ({:?}) at {}px",
            symbol.version,
            symbol.error_correction,
            request.pixel_size()
        );
        let raster = rasterize(&symbol, request.pixel_size());
        encode_png(&raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::qr_code::QrSymbol;
    use crate::structs::qr_request::GenerationRequest;
    use serde_json::json;

    fn validated(link: &str, size: Option<u32>) -> ValidatedRequest {
        let body = match size {
            Some(size) => json!({ "link": link, "size": size }),
            None => json!({ "link": link }),
        };
        serde_json::from_value::<GenerationRequest>(body)
            .unwrap()
            .into_validated()
            .unwrap()
    }

    #[test]
    fn generates_image_of_requested_size() {
        let generator = QrGenerator::default();
        for size in [128, 256, 333, 1024] {
            let image = generator
                .generate(&validated("https://example.com", Some(size)))
                .unwrap();
            assert_eq!((image.width, image.height), (size, size));
            let decoded = image::load_from_memory(&image.bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (size, size));
        }
    }

    #[test]
    fn omitted_size_gives_default_image() {
        let image = QrGenerator::default()
            .generate(&validated("https://example.com", None))
            .unwrap();
        assert_eq!((image.width, image.height), (320, 320));
    }

    #[test]
    fn corners_are_quiet_zone() {
        let image = QrGenerator::default()
            .generate(&validated("https://example.com", Some(256)))
            .unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap().to_luma8();
        for (x, y) in [(0, 0), (255, 0), (0, 255), (255, 255)] {
            assert_eq!(decoded.get_pixel(x, y).0, [255]);
        }
        // 25 + 4 modules over 256 pixels puts the top-left finder at pixel ~18
        assert_eq!(decoded.get_pixel(20, 20).0, [0]);
    }

    #[test]
    fn repeated_generation_is_byte_identical() {
        let generator = QrGenerator::default();
        let request = validated("https://example.com/path?x=1", Some(512));
        let first = generator.generate(&request).unwrap();
        let second = generator.generate(&request).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn long_text_on_smallest_canvas_keeps_exact_size() {
        let link = format!("https://example.com/{}", "a".repeat(2000));
        let image = QrGenerator::default()
            .generate(&validated(&link, Some(128)))
            .unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (128, 128));
    }

    struct PanickingEncoder;

    impl SymbolEncoder for PanickingEncoder {
        fn encode(&self, _: &str, _: ErrorCorrection) -> Result<QrSymbol, GenerationError> {
            panic!("encoder exploded")
        }
    }

    #[test]
    fn encoder_panics_become_errors() {
        let generator = QrGenerator::new(Arc::new(PanickingEncoder));
        let err = generator
            .generate(&validated("https://example.com", None))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Panicked(ref reason) if reason == "encoder exploded"));
    }

    struct FixedEncoder;

    impl SymbolEncoder for FixedEncoder {
        fn encode(&self, _: &str, level: ErrorCorrection) -> Result<QrSymbol, GenerationError> {
            Ok(QrSymbol {
                version: 1,
                error_correction: level,
                width: 1,
                modules: vec![true],
            })
        }
    }

    #[test]
    fn encoder_is_replaceable() {
        let image = QrGenerator::new(Arc::new(FixedEncoder))
            .generate(&validated("https://example.com", Some(128)))
            .unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap().to_luma8();
        // 1 module + 4 quiet modules: the centre fifth is dark
        assert_eq!(decoded.get_pixel(64, 64).0, [0]);
        assert_eq!(decoded.get_pixel(10, 64).0, [255]);
    }
}
