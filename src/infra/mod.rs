pub mod factory;
pub mod notify;
pub mod qr;
pub mod repositories;
