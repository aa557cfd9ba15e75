//! PageTrim — a per-site page decluttering engine.
//!
//! Users mark elements of a page as hidden or rescaled; the marks persist per
//! site and are reapplied on every load. This library crate exposes all
//! modules for use by the CLI binary and integration tests.

pub mod command_handler;
pub mod dom;
pub mod platform;
pub mod services;
pub mod session;
pub mod storage;
pub mod types;
