pub mod http_qr_service;
