use crate::utils::qr_generator::QrGenerator;

/// Read-only data shared by every worker
#[derive(Clone, Default)]
pub struct AppState {
    pub generator: QrGenerator,
}
