pub mod auth;
pub mod conditional;
pub mod cors;
pub mod http;
pub mod rate_limit;
pub mod security_headers;
