//! Expected failures against the server under test

use std::fs;

use predicates::prelude::*;

use super::FunctionalTestContext;

/// Config for the same server with a wrong password
fn wrong_password_config(ctx: &FunctionalTestContext, dir: &std::path::Path) -> String {
    let status = ctx.run_success(&["status"]);
    let base_url = status
        .lines()
        .find_map(|line| line.split("Server: ").nth(1))
        .expect("status shows the server")
        .trim()
        .to_string();

    let path = dir.join("config.yaml");
    fs::write(
        &path,
        format!("base_url: {base_url}\nauth:\n  username: admin\n  password: definitely-wrong\n"),
    )
    .expect("failed to write config");
    path.display().to_string()
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_wrong_password_fails_token_issue() {
    let ctx = FunctionalTestContext::new();
    let temp = tempfile::tempdir().expect("tempdir");
    let bad = FunctionalTestContext {
        config: Some(wrong_password_config(&ctx, temp.path())),
        ..FunctionalTestContext::new()
    };

    let stderr = bad.run_failure(&["auth", "--auth", "jwt"]);
    assert!(stderr.starts_with("Error:"), "{stderr}");
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_wrong_password_fails_the_run() {
    let ctx = FunctionalTestContext::new();
    let temp = tempfile::tempdir().expect("tempdir");
    let bad = FunctionalTestContext {
        config: Some(wrong_password_config(&ctx, temp.path())),
        ..FunctionalTestContext::new()
    };

    bad.run(&["run", "--scenario", "referenced-content", "--auth", "basic"])
        .failure()
        .stderr(predicate::str::contains("scenario step(s) failed"));
}
