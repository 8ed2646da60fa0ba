//! `<AccessGuard>` component.

use leptos::*;

use opsdesk_auth::{AccessRequirement, FallbackMode, GuardView, RoleCode};

use crate::frontend::use_access;
use crate::presentation::{self, MutedWrapper, OVERLAY_STYLE, WRAPPER_STYLE};

/// Renders `children` only when the live access context satisfies every
/// supplied requirement; otherwise applies `fallback` (or `custom_fallback`).
///
/// Props may be plain values or signals. The guard re-evaluates when the
/// access context or any prop changes.
#[component]
pub fn AccessGuard(
    #[prop(optional, into)] permission: MaybeProp<String>,
    #[prop(optional, into)] any_permissions: MaybeProp<Vec<String>>,
    #[prop(optional, into)] all_permissions: MaybeProp<Vec<String>>,
    #[prop(optional, into)] min_level: MaybeProp<i32>,
    #[prop(optional, into)] roles: MaybeProp<Vec<RoleCode>>,
    #[prop(optional, into)] fallback: MaybeSignal<FallbackMode>,
    #[prop(optional, into)] tooltip_message: MaybeProp<String>,
    #[prop(optional, into)] custom_fallback: Option<ViewFn>,
    children: ChildrenFn,
) -> impl IntoView {
    let access = use_access();
    let has_custom = custom_fallback.is_some();

    let guard = move || opsdesk_auth::AccessGuard {
        requirement: AccessRequirement {
            permission: permission.get(),
            any_permissions: any_permissions.get(),
            all_permissions: all_permissions.get(),
            min_level: min_level.get(),
            roles: roles.get(),
        },
        fallback: fallback.get(),
        tooltip_message: tooltip_message.get(),
    };

    move || {
        let view = presentation::decide(&guard(), &access.get(), has_custom);
        let muted = presentation::muted_wrapper(&view);
        match view {
            GuardView::Children(()) => children().into_view(),
            GuardView::Nothing => ().into_view(),
            GuardView::Muted(()) => muted_children(muted, &children),
            GuardView::Disabled { tooltip, .. } => view! {
                <div
                    class="access-guard access-guard--disabled"
                    style=WRAPPER_STYLE
                    title=tooltip.clone()
                >
                    {muted_children(muted, &children)}
                    <div
                        class="access-guard__overlay"
                        style=OVERLAY_STYLE
                        title=tooltip
                        on:click=|ev: ev::MouseEvent| {
                            ev.prevent_default();
                            ev.stop_propagation();
                        }
                    ></div>
                </div>
            }
            .into_view(),
            GuardView::Custom(()) => custom_fallback.as_ref().map(ViewFn::run).into_view(),
        }
    }
}

fn muted_children(wrapper: Option<MutedWrapper>, children: &ChildrenFn) -> View {
    let Some(wrapper) = wrapper else {
        return children().into_view();
    };
    view! {
        <div
            class=wrapper.class
            style=wrapper.style
            inert=wrapper.inert
            aria-disabled=wrapper.aria_disabled.to_string()
        >
            {children()}
        </div>
    }
    .into_view()
}
