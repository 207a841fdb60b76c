use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{Color, QrCode, Version};

use crate::errors::GenerationError;
use crate::models::qr_code::{ErrorCorrection, QrSymbol};

/// Turns text into a logical QR matrix. Any conformant implementation can be plugged in.
pub trait SymbolEncoder {
    fn encode(&self, text: &str, level: ErrorCorrection) -> Result<QrSymbol, GenerationError>;
}

/// Byte-mode encoder on top of the `qrcode` crate.
///
/// Picks the smallest normal version (1-40) that holds the whole input as a
/// single byte segment. Reed-Solomon blocks, module placement and the
/// penalty-scored choice among the eight masks are done by `QrCode::with_bits`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteModeEncoder;

impl ByteModeEncoder {
    fn smallest_fitting_bits(data: &[u8], level: qrcode::EcLevel) -> Result<(u8, Bits), GenerationError> {
        for version in 1..=40i16 {
            let mut bits = Bits::new(Version::Normal(version));
            let pushed = bits
                .push_byte_data(data)
                .and_then(|_| bits.push_terminator(level));
            match pushed {
                Ok(()) => return Ok((version as u8, bits)),
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GenerationError::DataTooLong)
    }
}

impl SymbolEncoder for ByteModeEncoder {
    fn encode(&self, text: &str, level: ErrorCorrection) -> Result<QrSymbol, GenerationError> {
        let ec_level = level.into();
        let (version, bits) = Self::smallest_fitting_bits(text.as_bytes(), ec_level)?;
        let code = QrCode::with_bits(bits, ec_level)?;

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        log::debug!("encoded {} bytes as version {} ({}x{})", text.len(), version, width, width);

        Ok(QrSymbol {
            version,
            error_correction: level,
            width,
            modules,
        })
    }
}
