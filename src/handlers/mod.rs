//! HTTP handlers.

pub mod proxy;
