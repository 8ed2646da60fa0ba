//! Role authority ordering.
//!
//! Levels are integers where a **smaller** number means **more** authority
//! (`developer = 1` outranks `viewer = 10`). The table is a value passed in by
//! the caller so tenants and tests can override it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{RoleCode, RoleRecord};

/// Floor for the level assigned to role codes missing from the table.
///
/// With the platform table every unknown role gets exactly this level. A table
/// configuring levels at or past it pushes the unknown level further out; see
/// [`RoleHierarchy::unknown_level`].
pub const UNKNOWN_ROLE_LEVEL: i32 = 999;

/// Largest level a table may configure; one below the last representable
/// unknown level.
const MAX_CONFIGURED_LEVEL: i32 = i32::MAX - 1;

/// Mapping from role code to authority level, plus comparison primitives.
///
/// Unknown role codes rank strictly below every configured role, whatever
/// levels the table uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LevelTable", into = "LevelTable")]
pub struct RoleHierarchy {
    levels: BTreeMap<RoleCode, i32>,
    unknown_level: i32,
}

/// Wire form: `{ "levels": { code: level } }`.
#[derive(Serialize, Deserialize)]
struct LevelTable {
    levels: BTreeMap<RoleCode, i32>,
}

impl From<LevelTable> for RoleHierarchy {
    fn from(table: LevelTable) -> Self {
        Self::new(table.levels)
    }
}

impl From<RoleHierarchy> for LevelTable {
    fn from(hierarchy: RoleHierarchy) -> Self {
        Self {
            levels: hierarchy.levels,
        }
    }
}

impl Default for RoleHierarchy {
    /// The platform's standard role table.
    fn default() -> Self {
        Self::new([
            ("developer", 1),
            ("super_admin", 2),
            ("admin", 3),
            ("director", 4),
            ("hr_manager", 5),
            ("manager", 6),
            ("supervisor", 7),
            ("technician", 8),
            ("employee", 9),
            ("viewer", 10),
        ])
    }
}

impl RoleHierarchy {
    /// Build from `(code, level)` pairs.
    ///
    /// Levels above `i32::MAX - 1` are clamped to it so the unknown level can
    /// stay strictly weaker.
    pub fn new<C, I>(levels: I) -> Self
    where
        C: Into<RoleCode>,
        I: IntoIterator<Item = (C, i32)>,
    {
        let levels: BTreeMap<RoleCode, i32> = levels
            .into_iter()
            .map(|(code, level)| {
                let code: RoleCode = code.into();
                if level > MAX_CONFIGURED_LEVEL {
                    tracing::warn!(role = %code, level, max = MAX_CONFIGURED_LEVEL, "role level clamped");
                }
                (code, level.min(MAX_CONFIGURED_LEVEL))
            })
            .collect();

        let unknown_level = levels
            .values()
            .max()
            .map_or(UNKNOWN_ROLE_LEVEL, |max| UNKNOWN_ROLE_LEVEL.max(max + 1));

        Self { levels, unknown_level }
    }

    /// Build the table from a directory role catalog.
    pub fn from_roles(roles: &[RoleRecord]) -> Self {
        Self::new(roles.iter().map(|r| (r.code.clone(), r.level)))
    }

    /// Parse a `{"levels": {"viewer": 10, ...}}` document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Configured level of `code`, or [`unknown_level`](Self::unknown_level).
    pub fn level_of(&self, code: &str) -> i32 {
        self.levels.get(code).copied().unwrap_or(self.unknown_level)
    }

    /// Level of any code missing from the table: [`UNKNOWN_ROLE_LEVEL`], or one
    /// past the weakest configured level when the table reaches that far.
    pub fn unknown_level(&self) -> i32 {
        self.unknown_level
    }

    pub fn contains(&self, code: &str) -> bool {
        self.levels.contains_key(code)
    }

    /// `true` iff `code` is at least as powerful as `required_level`.
    pub fn has_required_level(&self, code: &str, required_level: i32) -> bool {
        self.level_of(code) <= required_level
    }

    /// An inviter may grant its own level or anything weaker, never stronger.
    pub fn can_invite_role(&self, inviter: &str, invitee: &str) -> bool {
        self.level_of(inviter) <= self.level_of(invitee)
    }

    /// Every configured role `inviter` may hand out, strongest first.
    pub fn invitable_roles(&self, inviter: &str) -> Vec<RoleCode> {
        let floor = self.level_of(inviter);
        self.roles()
            .filter(|(_, level)| *level >= floor)
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// Configured roles ordered by level, then code.
    pub fn roles(&self) -> impl Iterator<Item = (&RoleCode, i32)> {
        let mut roles: Vec<_> = self.levels.iter().map(|(c, l)| (c, *l)).collect();
        roles.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        roles.into_iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn viewer_does_not_meet_admin_level() {
        let h = RoleHierarchy::default();
        assert!(!h.has_required_level("viewer", 3));
    }

    #[test]
    fn equal_level_satisfies_requirement() {
        let h = RoleHierarchy::default();
        assert!(h.has_required_level("admin", 3));
        assert!(!h.has_required_level("admin", 2));
    }

    #[test]
    fn unknown_role_gets_lowest_authority() {
        let h = RoleHierarchy::default();
        assert_eq!(h.level_of("intern"), UNKNOWN_ROLE_LEVEL);
        assert!(!h.has_required_level("intern", 10));
        assert!(!h.can_invite_role("intern", "viewer"));
        assert!(h.can_invite_role("viewer", "intern"));
    }

    #[test]
    fn invite_only_at_or_below_own_authority() {
        let h = RoleHierarchy::default();
        assert!(h.can_invite_role("manager", "viewer"));
        assert!(!h.can_invite_role("viewer", "admin"));
        assert!(h.can_invite_role("manager", "manager"));
    }

    #[test]
    fn invitable_roles_are_own_level_and_weaker() {
        let h = RoleHierarchy::default();
        let codes: Vec<_> = h
            .invitable_roles("supervisor")
            .into_iter()
            .map(|c| c.as_str().to_string())
            .collect();
        assert_eq!(codes, vec!["supervisor", "technician", "employee", "viewer"]);
    }

    #[test]
    fn unknown_inviter_can_invite_nobody_configured() {
        let h = RoleHierarchy::default();
        assert!(h.invitable_roles("intern").is_empty());
    }

    #[test]
    fn tenant_override_from_json() {
        let h = RoleHierarchy::from_json(r#"{"levels":{"owner":1,"auditor":4}}"#).unwrap();
        assert_eq!(h.level_of("auditor"), 4);
        assert_eq!(h.level_of("viewer"), UNKNOWN_ROLE_LEVEL);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn unknown_role_stays_below_levels_past_the_floor() {
        let h = RoleHierarchy::from_json(r#"{"levels":{"owner":1,"guest":1000}}"#).unwrap();
        assert_eq!(h.unknown_level(), 1001);
        assert_eq!(h.level_of("intern"), 1001);
        assert!(!h.can_invite_role("intern", "guest"));
        assert!(h.can_invite_role("guest", "intern"));
        assert!(!h.has_required_level("intern", 1000));

        let h = RoleHierarchy::new([("legacy", UNKNOWN_ROLE_LEVEL)]);
        assert!(h.level_of("intern") > h.level_of("legacy"));
    }

    #[test]
    fn extreme_levels_are_clamped_below_unknown() {
        let h = RoleHierarchy::new([("root", 1), ("nobody", i32::MAX)]);
        assert_eq!(h.level_of("nobody"), i32::MAX - 1);
        assert_eq!(h.unknown_level(), i32::MAX);
        assert!(!h.can_invite_role("intern", "nobody"));
    }

    #[test]
    fn serde_keeps_wire_shape() {
        let h = RoleHierarchy::new([("viewer", 10)]);
        assert_eq!(serde_json::to_string(&h).unwrap(), r#"{"levels":{"viewer":10}}"#);
        assert_eq!(RoleHierarchy::from_json(r#"{"levels":{"viewer":10}}"#).unwrap(), h);
    }

    #[test]
    fn from_directory_catalog() {
        let roles = vec![RoleRecord {
            id: opsdesk_core::RoleId::new(),
            code: RoleCode::new("inspector"),
            name: "Inspector".to_string(),
            level: 8,
        }];
        let h = RoleHierarchy::from_roles(&roles);
        assert!(h.contains("inspector"));
        assert!(h.has_required_level("inspector", 8));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Every configured role meets its own level and misses the next one up.
        #[test]
        fn level_boundary_is_exact(levels in prop::collection::btree_map("[a-z]{1,8}", 1i32..100, 1..12)) {
            let h = RoleHierarchy::new(levels.iter().map(|(c, l)| (c.clone(), *l)));
            for (code, level) in &levels {
                prop_assert!(h.has_required_level(code, *level));
                prop_assert!(!h.has_required_level(code, *level - 1));
            }
        }

        /// No configured role, at any level, is out-ranked by an unknown one.
        #[test]
        fn unknown_never_outranks_configured(levels in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 1..12)) {
            let h = RoleHierarchy::new(levels.iter().map(|(c, l)| (c.clone(), *l)));
            for code in levels.keys() {
                prop_assert!(h.level_of(code) < h.level_of("UNLISTED"));
                prop_assert!(!h.can_invite_role("UNLISTED", code));
            }
        }

        #[test]
        fn can_invite_matches_level_order(a in 1i32..20, b in 1i32..20) {
            let h = RoleHierarchy::new([("left", a), ("right", b)]);
            prop_assert_eq!(h.can_invite_role("left", "right"), a <= b);
            prop_assert!(h.can_invite_role("left", "left"));
        }
    }
}
