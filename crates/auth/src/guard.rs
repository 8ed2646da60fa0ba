//! Declarative UI gating.
//!
//! A guard pairs an [`AccessRequirement`] with a [`FallbackMode`]. Evaluation is
//! pure; presentation is a tagged variant ([`GuardView`]) that any renderer can
//! map to its own node type.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use opsdesk_core::DomainError;

use crate::{AccessContext, RoleCode};

/// Tooltip shown on disabled content when the caller supplies none.
pub const DEFAULT_TOOLTIP: &str = "You do not have permission to perform this action";

// ─────────────────────────────────────────────────────────────────────────────
// Requirement
// ─────────────────────────────────────────────────────────────────────────────

/// What a piece of UI requires.
///
/// Every supplied category must pass; an omitted category is no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessRequirement {
    /// One canonical permission string.
    pub permission: Option<String>,
    /// At least one of these must be held.
    pub any_permissions: Option<Vec<String>>,
    /// All of these must be held.
    pub all_permissions: Option<Vec<String>>,
    /// Active role level must be `<=` this.
    pub min_level: Option<i32>,
    /// Active role code must be one of these.
    pub roles: Option<Vec<RoleCode>>,
}

impl AccessRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn any_of<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any_permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn all_of<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all_permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn min_level(mut self, level: i32) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleCode>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// No category supplied.
    pub fn is_empty(&self) -> bool {
        self.permission.is_none()
            && self.any_permissions.is_none()
            && self.all_permissions.is_none()
            && self.min_level.is_none()
            && self.roles.is_none()
    }

    /// Evaluate every supplied category against `ctx`.
    pub fn evaluate(&self, ctx: &AccessContext) -> AccessDecision {
        let mut denials = Vec::new();

        if let Some(permission) = &self.permission {
            if !ctx.has_permission_str(permission) {
                denials.push(DenialReason::MissingPermission(permission.clone()));
            }
        }

        if let Some(any) = &self.any_permissions {
            if !ctx.has_any_permission(any) {
                denials.push(DenialReason::MissingAnyOf(any.clone()));
            }
        }

        if let Some(all) = &self.all_permissions {
            if !ctx.has_all_permissions(all) {
                let missing = all.iter().filter(|p| !ctx.has_permission_str(p)).cloned().collect();
                denials.push(DenialReason::MissingAllOf(missing));
            }
        }

        if let Some(required) = self.min_level {
            if !ctx.has_role_level(required) {
                denials.push(DenialReason::InsufficientLevel {
                    required,
                    actual: ctx.level(),
                });
            }
        }

        if let Some(allowed) = &self.roles {
            let listed = ctx.role().is_some_and(|role| allowed.contains(role));
            if !listed {
                denials.push(DenialReason::RoleNotAllowed {
                    role: ctx.role().cloned(),
                });
            }
        }

        if denials.is_empty() {
            AccessDecision::Granted
        } else {
            tracing::debug!(role = ?ctx.role(), ?denials, "access requirement not met");
            AccessDecision::Denied(denials)
        }
    }
}

/// Why a category failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DenialReason {
    MissingPermission(String),
    MissingAnyOf(Vec<String>),
    /// Lists only the entries that were not held.
    MissingAllOf(Vec<String>),
    InsufficientLevel { required: i32, actual: Option<i32> },
    RoleNotAllowed { role: Option<RoleCode> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reasons", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Denied(Vec<DenialReason>),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn reasons(&self) -> &[DenialReason] {
        match self {
            AccessDecision::Granted => &[],
            AccessDecision::Denied(reasons) => reasons,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation
// ─────────────────────────────────────────────────────────────────────────────

/// How denied content is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// The user must not learn the content exists.
    Hide,
    /// Visible for context, muted and inert.
    Show,
    /// Muted, pointer input intercepted, explanatory tooltip.
    #[default]
    Disable,
}

impl FromStr for FallbackMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hide" => Ok(Self::Hide),
            "show" => Ok(Self::Show),
            "disable" => Ok(Self::Disable),
            other => Err(DomainError::validation(format!("unknown fallback mode '{other}'"))),
        }
    }
}

/// What a guard renders, generic over the renderer's node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<N> {
    /// Access granted: children exactly as passed.
    Children(N),
    /// `Hide`: nothing.
    Nothing,
    /// `Show`: children, muted and non-interactive.
    Muted(N),
    /// `Disable`: children muted behind an input-blocking overlay with a tooltip.
    Disabled { children: N, tooltip: String },
    /// Caller-supplied replacement.
    Custom(N),
}

impl<N> GuardView<N> {
    pub fn is_nothing(&self) -> bool {
        matches!(self, GuardView::Nothing)
    }
}

/// Pick the view for a decision.
///
/// A custom fallback, when supplied, replaces every built-in denial mode.
pub fn present<N>(
    decision: &AccessDecision,
    fallback: FallbackMode,
    children: N,
    custom_fallback: Option<N>,
    tooltip_message: Option<&str>,
) -> GuardView<N> {
    if decision.is_granted() {
        return GuardView::Children(children);
    }
    if let Some(custom) = custom_fallback {
        return GuardView::Custom(custom);
    }
    match fallback {
        FallbackMode::Hide => hide(),
        FallbackMode::Show => show_muted(children),
        FallbackMode::Disable => disable(children, tooltip_message),
    }
}

fn hide<N>() -> GuardView<N> {
    GuardView::Nothing
}

fn show_muted<N>(children: N) -> GuardView<N> {
    GuardView::Muted(children)
}

fn disable<N>(children: N, tooltip_message: Option<&str>) -> GuardView<N> {
    GuardView::Disabled {
        children,
        tooltip: tooltip_message.unwrap_or(DEFAULT_TOOLTIP).to_string(),
    }
}

/// Declarative guard: requirement + denial behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessGuard {
    #[serde(flatten)]
    pub requirement: AccessRequirement,
    pub fallback: FallbackMode,
    pub tooltip_message: Option<String>,
}

impl AccessGuard {
    pub fn new(requirement: AccessRequirement) -> Self {
        Self {
            requirement,
            ..Default::default()
        }
    }

    pub fn fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn tooltip(mut self, message: impl Into<String>) -> Self {
        self.tooltip_message = Some(message.into());
        self
    }

    /// Evaluate against `ctx` and choose what to render.
    pub fn render<N>(&self, ctx: &AccessContext, children: N, custom_fallback: Option<N>) -> GuardView<N> {
        let decision = self.requirement.evaluate(ctx);
        present(
            &decision,
            self.fallback,
            children,
            custom_fallback,
            self.tooltip_message.as_deref(),
        )
    }
}
