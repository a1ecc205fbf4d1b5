// Tests against the bundled user-overrides.js
use ffov::{bundled_overrides, lint, OverrideDocument, PrefValue, Rule, Severity, BUNDLED_OVERRIDES};
use std::collections::HashMap;

#[test]
fn test_bundled_file_parses() {
    let doc = bundled_overrides().expect("bundled overrides should parse");

    assert_eq!(doc.active().count(), 85);
    assert_eq!(doc.disabled().count(), 23);
    assert!(doc.malformed().is_empty());
    assert_eq!(doc.sections().len(), 18);
}

#[test]
fn test_bundled_file_round_trips() {
    let doc = bundled_overrides().unwrap();
    assert_eq!(doc.render(), BUNDLED_OVERRIDES);
}

#[test]
fn test_bundled_file_has_no_lint_errors() {
    let report = lint(&bundled_overrides().unwrap());

    let errors: Vec<String> = report
        .at_least(Severity::Error)
        .map(|i| i.to_string())
        .collect();
    assert!(errors.is_empty(), "unexpected errors: {:#?}", errors);

    // browser.ml.chat.enabled, browser.ml.enable and browser.tabs.firefox-view
    // are each set twice with the same value
    let redundant: Vec<&str> = report
        .issues
        .iter()
        .filter(|i| i.rule == Rule::RedundantDuplicate)
        .filter_map(|i| i.key.as_deref())
        .collect();
    assert_eq!(
        redundant,
        vec!["browser.ml.chat.enabled", "browser.ml.enable", "browser.tabs.firefox-view"]
    );
}

#[test]
fn test_active_keys_are_dotted() {
    let doc = bundled_overrides().unwrap();
    for entry in doc.active() {
        assert!(ffov::is_valid_key(&entry.key), "bad key {:?}", entry.key);
    }
}

#[test]
fn test_no_conflicting_active_duplicates() {
    let doc = bundled_overrides().unwrap();
    let mut seen: HashMap<&str, &PrefValue> = HashMap::new();
    for entry in doc.active() {
        if let Some(previous) = seen.insert(&entry.key, &entry.value) {
            assert_eq!(previous, &entry.value, "conflicting values for {}", entry.key);
        }
    }
}

#[test]
fn test_startup_page_is_integer() {
    let doc = bundled_overrides().unwrap();
    assert_eq!(
        doc.effective_value("browser.startup.page"),
        Some(&PrefValue::Integer(3))
    );

    let entry = doc.find("browser.startup.page").next().unwrap();
    assert_eq!(entry.section.as_deref(), Some("STARTUP & SESSION"));
    assert!(entry.annotation.as_deref().unwrap().contains("resume previous session"));
}

#[test]
fn test_every_disabled_entry_can_be_enabled_alone() {
    let doc = bundled_overrides().unwrap();
    let keys: Vec<String> = doc
        .disabled()
        .filter(|e| doc.effective_value(&e.key).is_none())
        .map(|e| e.key.clone())
        .collect();
    assert!(!keys.is_empty());

    for key in keys {
        let mut copy = doc.clone();
        assert_eq!(copy.enable(&key).unwrap(), 1, "enabling {}", key);
        assert!(copy.effective_value(&key).is_some());
        assert!(!lint(&copy).has_errors(), "enabling {} introduced errors", key);
    }
}

#[test]
fn test_enabling_resist_fingerprinting_keeps_exemptions() {
    let mut doc = bundled_overrides().unwrap();
    assert_eq!(doc.enable("privacy.resistFingerprinting").unwrap(), 1);

    assert_eq!(
        doc.effective_value("privacy.resistFingerprinting"),
        Some(&PrefValue::Bool(false))
    );
    assert_eq!(
        doc.effective_value("privacy.resistFingerprinting.exemptedDomains"),
        Some(&PrefValue::String("*.vlaris.net".to_string()))
    );

    let report = lint(&doc);
    assert!(!report.has_errors());
    assert!(!report
        .issues
        .iter()
        .any(|i| i.key.as_deref() == Some("privacy.resistFingerprinting.exemptedDomains")));
}

#[test]
fn test_enabling_hidden_bookmarks_conflicts() {
    let mut doc = bundled_overrides().unwrap();
    let report = lint(&doc);
    assert!(report.issues.iter().any(|i| i.rule == Rule::EnableWouldConflict
        && i.key.as_deref() == Some("browser.toolbars.bookmarks.visibility")));

    assert!(matches!(
        doc.enable("browser.toolbars.bookmarks.visibility"),
        Err(ffov::Error::ConflictingOverride { .. })
    ));
}

#[test]
fn test_disable_then_enable_restores_text() {
    let mut doc = bundled_overrides().unwrap();
    assert_eq!(doc.disable("sidebar.verticalTabs").unwrap(), 1);
    assert!(doc.effective_value("sidebar.verticalTabs").is_none());
    assert_eq!(doc.enable("sidebar.verticalTabs").unwrap(), 1);
    assert_eq!(doc.render(), BUNDLED_OVERRIDES);
}

#[test]
fn test_block_comment_example_is_not_an_entry() {
    let doc = bundled_overrides().unwrap();
    assert!(doc
        .find("security.ssl.require_safe_negotiation")
        .next()
        .is_none());
}

#[test]
fn test_escaped_json_string_value() {
    let doc = bundled_overrides().unwrap();
    match doc.effective_value("browser.firefox-view.feature-tour") {
        Some(PrefValue::String(s)) => assert_eq!(s, r#"{"screen":"","complete":true}"#),
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn test_broken_fixture_errors() {
    let content = std::fs::read_to_string("tests/fixtures/broken-overrides.js").unwrap();
    let doc = OverrideDocument::parse(&content).unwrap();
    let report = lint(&doc);

    let error_rules: Vec<Rule> = report.at_least(Severity::Error).map(|i| i.rule).collect();
    assert_eq!(
        error_rules,
        vec![
            Rule::TypeMismatch,
            Rule::ConflictingDuplicate,
            Rule::MalformedDisabledEntry,
            Rule::MalformedKey,
        ]
    );
}
