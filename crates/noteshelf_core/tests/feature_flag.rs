//! Environment-backed flag evaluation.
//!
//! Kept as a single test so no other test in this binary races on the
//! process environment.

use noteshelf_core::{dependency_upgraded_next, FeatureFlags, DEPENDENCY_UPGRADED_NEXT};

#[test]
fn dependency_flag_tracks_environment_on_every_call() {
    std::env::remove_var(DEPENDENCY_UPGRADED_NEXT.name());
    assert!(!dependency_upgraded_next());

    for value in ["", "false", "TRUE", "1", "yes"] {
        std::env::set_var(DEPENDENCY_UPGRADED_NEXT.name(), value);
        assert!(!dependency_upgraded_next(), "`{value}` must not enable");
    }

    std::env::set_var(DEPENDENCY_UPGRADED_NEXT.name(), "true");
    assert!(dependency_upgraded_next());
    for _ in 0..5 {
        assert!(DEPENDENCY_UPGRADED_NEXT.is_enabled());
    }
    assert!(FeatureFlags::from_env().dependency_upgraded_next);

    std::env::remove_var(DEPENDENCY_UPGRADED_NEXT.name());
    assert!(!dependency_upgraded_next());
    assert!(!FeatureFlags::from_env().dependency_upgraded_next);
}
