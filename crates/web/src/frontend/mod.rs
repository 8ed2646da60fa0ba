//! Leptos bindings for the access core.

pub mod access;
pub mod guard;

pub use access::{provide_access, use_access};
pub use guard::AccessGuard;

/// Call once before mounting the application.
pub fn init() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();
}
