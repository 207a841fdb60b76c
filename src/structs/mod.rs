pub mod qr_request;
