//! Markup plan for a guard decision, independent of the DOM renderer.
//!
//! Denied-but-visible children (`Show` and `Disable`) always sit in an inert
//! wrapper: no focus, no pointer input, no keyboard activation.

use opsdesk_auth::{AccessContext, AccessGuard, GuardView};

pub const MUTED_STYLE: &str = "opacity: 0.5; pointer-events: none;";
pub const WRAPPER_STYLE: &str = "position: relative; display: inline-block;";
pub const OVERLAY_STYLE: &str = "position: absolute; inset: 0; cursor: not-allowed;";

/// Attributes of the element wrapping muted children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutedWrapper {
    pub class: &'static str,
    pub style: &'static str,
    /// Sets the `inert` attribute.
    pub inert: bool,
    pub aria_disabled: bool,
}

/// Decide what to render for the guard's current props and context.
///
/// Children and the custom fallback are placeholders; the renderer supplies
/// its own nodes for each variant.
pub fn decide(guard: &AccessGuard, ctx: &AccessContext, has_custom_fallback: bool) -> GuardView<()> {
    guard.render(ctx, (), has_custom_fallback.then_some(()))
}

/// The wrapper for muted children, if `view` renders any.
pub fn muted_wrapper<N>(view: &GuardView<N>) -> Option<MutedWrapper> {
    let class = match view {
        GuardView::Muted(_) => "access-guard access-guard--muted",
        GuardView::Disabled { .. } => "access-guard__content",
        GuardView::Children(_) | GuardView::Nothing | GuardView::Custom(_) => return None,
    };
    Some(MutedWrapper {
        class,
        style: MUTED_STYLE,
        inert: true,
        aria_disabled: true,
    })
}
