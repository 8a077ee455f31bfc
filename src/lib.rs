pub mod api;
pub mod config;
pub mod linkedin;
pub mod transport;
