//! Full scenario runs against the server under test

use super::FunctionalTestContext;

fn assert_no_failed_steps(report: &serde_json::Value) {
    for step in report["steps"].as_array().expect("steps") {
        assert_ne!(step["status"], "failed", "{step}");
    }
    assert!(report.get("cleanup_errors").is_none(), "{report}");
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_content_unit_lifecycle() {
    let ctx = FunctionalTestContext::destructive();

    let data = ctx.run_json(&["run", "--scenario", "content-unit"]);
    assert_eq!(data[0]["scenario"], "content-unit");
    assert_no_failed_steps(&data[0]);
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_referenced_content_guard() {
    let ctx = FunctionalTestContext::new();

    let data = ctx.run_json(&["run", "--scenario", "referenced-content"]);
    assert_eq!(data[0]["scenario"], "referenced-content");
    assert_no_failed_steps(&data[0]);
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_both_auth_variants_run_the_guard() {
    let ctx = FunctionalTestContext::new();

    for mode in ["basic", "jwt"] {
        let data = ctx.run_json(&["run", "--scenario", "referenced-content", "--auth", mode]);
        assert_eq!(data[0]["auth"], mode);
        assert_no_failed_steps(&data[0]);
    }
}
