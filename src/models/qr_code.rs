/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,      // ~7% recovery
    Medium,   // ~15% recovery
    Quartile, // ~25% recovery
    High,     // ~30% recovery
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

/// Logical QR matrix: `width * width` modules in row-major order, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSymbol {
    pub version: u8,
    pub error_correction: ErrorCorrection,
    pub width: usize,
    pub modules: Vec<bool>,
}

impl QrSymbol {
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

/// Square PNG image ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    pub const DATA_URL_PREFIX: &'static str = "data:image/png;base64,";

    pub fn to_data_url(&self) -> String {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        format!("{}{}", Self::DATA_URL_PREFIX, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_has_png_prefix() {
        let image = RenderedImage {
            bytes: vec![0x89, b'P', b'N', b'G'],
            width: 1,
            height: 1,
        };
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn levels_map_onto_encoder_levels() {
        assert_eq!(qrcode::EcLevel::from(ErrorCorrection::Low), qrcode::EcLevel::L);
        assert_eq!(qrcode::EcLevel::from(ErrorCorrection::Medium), qrcode::EcLevel::M);
        assert_eq!(qrcode::EcLevel::from(ErrorCorrection::Quartile), qrcode::EcLevel::Q);
        assert_eq!(qrcode::EcLevel::from(ErrorCorrection::High), qrcode::EcLevel::H);
    }

    #[test]
    fn modules_are_row_major() {
        let symbol = QrSymbol {
            version: 1,
            error_correction: ErrorCorrection::Medium,
            width: 2,
            modules: vec![true, false, false, true],
        };
        assert!(symbol.is_dark(0, 0));
        assert!(!symbol.is_dark(1, 0));
        assert!(!symbol.is_dark(0, 1));
        assert!(symbol.is_dark(1, 1));
    }
}
