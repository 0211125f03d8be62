pub mod backends;
pub mod config;
pub mod http;
pub mod request_id;
