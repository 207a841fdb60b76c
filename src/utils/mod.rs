pub mod encoder;
pub mod qr_generator;
pub mod raster;
