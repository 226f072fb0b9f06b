//! Models loaded at startup.

pub mod config;
