//! Reactive access context.
//!
//! The store publishes every context swap on a `watch` channel; this module
//! mirrors it into a Leptos signal so guards re-render on sign-in, role change
//! and sign-out.

use std::sync::Arc;

use leptos::*;

use opsdesk_auth::{AccessContext, RoleHierarchy};
use opsdesk_infra::PermissionStore;

#[derive(Clone, Copy)]
struct LiveAccess(Signal<Arc<AccessContext>>);

/// Provide the store's live context to every descendant component.
pub fn provide_access(store: Arc<PermissionStore>) {
    let (access, set_access) = create_signal(store.current());
    let mut updates = store.subscribe();

    spawn_local(async move {
        while updates.changed().await.is_ok() {
            let ctx = updates.borrow_and_update().clone();
            set_access.set(ctx);
        }
        tracing::debug!("permission store dropped; access signal frozen");
    });

    provide_context(LiveAccess(access.into()));
}

/// The live context, or a signed-out one when no store was provided.
pub fn use_access() -> Signal<Arc<AccessContext>> {
    match use_context::<LiveAccess>() {
        Some(LiveAccess(access)) => access,
        None => {
            let anonymous = Arc::new(AccessContext::anonymous(Arc::new(RoleHierarchy::default())));
            Signal::derive(move || anonymous.clone())
        }
    }
}
