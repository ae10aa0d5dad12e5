//! Speech provider implementations

pub mod http_speech;
