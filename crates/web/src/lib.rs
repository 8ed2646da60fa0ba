//! `opsdesk-web`
//!
//! **Responsibility:** browser-side wiring of the access core.
//!
//! This crate provides:
//! - The session controller (sign-in / role change / sign-out lifecycle)
//! - The guard's markup plan (which wrapper, which attributes)
//! - The Leptos `AccessGuard` component (wasm32 only)

pub mod presentation;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use session::{SessionController, SessionEvent};
