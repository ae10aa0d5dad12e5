//! Request handlers

pub mod health;
pub mod playback;
pub mod speech;
pub mod stories;
