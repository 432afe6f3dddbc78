//! Functional tests that leave the server untouched

use predicates::prelude::*;

use super::FunctionalTestContext;

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_status_shows_config() {
    let ctx = FunctionalTestContext::new();

    ctx.run(&["status"])
        .success()
        .stdout(predicate::str::contains("Configuration"))
        .stdout(predicate::str::contains("Server:"));
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_basic_auth_selection() {
    let ctx = FunctionalTestContext::new();

    let data = ctx.run_json(&["auth", "--auth", "basic"]);
    assert_eq!(data["strategy"], "basic");
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_jwt_auth_selection() {
    let ctx = FunctionalTestContext::new();

    let data = ctx.run_json(&["auth", "--auth", "jwt"]);
    assert_eq!(data["strategy"], "jwt");
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_random_auth_selection_picks_a_variant() {
    let ctx = FunctionalTestContext::new();

    let data = ctx.run_json(&["auth", "--auth", "random"]);
    let strategy = data["strategy"].as_str().unwrap_or_default();
    assert!(strategy == "basic" || strategy == "jwt", "{strategy}");
}
