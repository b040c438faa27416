//! Environment-driven feature flags for dependency upgrades.
//!
//! # Responsibility
//! - Evaluate boolean flags that let pre-upgrade and post-upgrade dependency
//!   behavior live in one build.
//! - Capture flag values once at startup so request paths never read the
//!   process environment directly.
//!
//! # Invariants
//! - A flag is enabled iff its variable is exactly `"true"` (case-sensitive).
//! - Absence, non-UTF-8 content or any other value means disabled.
//! - Evaluation has no side effects and no error conditions.

use serde::Serialize;

/// Canonical variable gating post-upgrade dependency behavior.
pub const DEPENDENCY_UPGRADED_NEXT: FeatureFlag = FeatureFlag::new("DEPENDENCY_UPGRADED_NEXT");

const ENABLED_VALUE: &str = "true";

/// One boolean switch backed by a named environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlag {
    name: &'static str,
}

impl FeatureFlag {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Environment variable consulted by this flag.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the variable now and applies [`evaluate_flag_value`].
    ///
    /// Re-evaluated on every call; nothing is cached.
    pub fn is_enabled(&self) -> bool {
        let value = std::env::var(self.name).ok();
        evaluate_flag_value(value.as_deref())
    }

    /// Same predicate against an arbitrary variable source.
    pub fn is_enabled_in<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        evaluate_flag_value(lookup(self.name).as_deref())
    }
}

/// Pure flag predicate: `Some("true")` is the only enabling input.
pub fn evaluate_flag_value(value: Option<&str>) -> bool {
    value == Some(ENABLED_VALUE)
}

/// Returns whether the post-upgrade dependency path is selected.
pub fn dependency_upgraded_next() -> bool {
    DEPENDENCY_UPGRADED_NEXT.is_enabled()
}

/// Flag values captured at process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub dependency_upgraded_next: bool,
}

impl FeatureFlags {
    /// Snapshots every known flag from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            dependency_upgraded_next: DEPENDENCY_UPGRADED_NEXT.is_enabled_in(lookup),
        }
    }

    /// Picks the post-upgrade value when `dependency_upgraded_next` is set.
    pub fn select<T>(&self, pre_upgrade: T, post_upgrade: T) -> T {
        if self.dependency_upgraded_next {
            post_upgrade
        } else {
            pre_upgrade
        }
    }

    /// Label of the active dependency path, used in logs and health output.
    pub fn dependency_path(&self) -> &'static str {
        self.select("current", "next")
    }
}
