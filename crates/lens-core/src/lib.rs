//! Future Lens chat core.
//!
//! Pure Rust: everything platform-specific sits behind the traits in
//! [`ports`] and is supplied by `lens-platform`.

pub mod ports;
pub mod event_bus;
pub mod selector;
pub mod persona;
pub mod store;
pub mod orchestrator;
pub mod sse;
pub mod voice;
pub mod transcript;
