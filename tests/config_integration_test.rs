//! Integration tests for configuration loading

use hitoku::anonymization::anonymizer::redaction::count_tokens;
use hitoku::anonymization::{AnonymizationEngine, ExtractorKind, LexiconAnnotator};
use hitoku::config::load_config;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_configuration() {
    let config_file = write_toml(
        r#"
[application]
log_level = "debug"

[anonymization]
dry_run = false
pass_order = ["identifier", "pattern", "money", "nlp_entity"]
target_labels = ["PERSON", "GPE"]
address_labels = ["GPE"]
context_window = 4

[logging]
local_enabled = true
local_path = "/tmp/hitoku-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(config_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(
        config.anonymization.pass_order,
        vec![
            ExtractorKind::Identifier,
            ExtractorKind::Pattern,
            ExtractorKind::Money,
            ExtractorKind::NlpEntity,
        ]
    );
    assert_eq!(config.anonymization.target_labels, vec!["PERSON", "GPE"]);
    assert_eq!(config.anonymization.context_window, 4);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_unknown_extractor_is_rejected() {
    let config_file = write_toml(
        r#"
[anonymization]
pass_order = ["pattern", "telepathy"]
"#,
    );

    assert!(load_config(config_file.path()).is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let config_file = write_toml(
        r#"
[application]
log_level = "verbose"
"#,
    );

    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("log_level"));
}

#[test]
fn test_env_substitution_for_pattern_library() {
    let overlay = write_toml("[categories]\nEMPLOYEE = ['社員番号[A-Z]\\d{3}']\n");
    std::env::set_var(
        "HITOKU_TEST_PATTERN_LIBRARY",
        overlay.path().to_string_lossy().to_string(),
    );

    let config_file = write_toml(
        r#"
[anonymization]
pattern_library = "${HITOKU_TEST_PATTERN_LIBRARY}"
"#,
    );

    let config = load_config(config_file.path()).unwrap();
    std::env::remove_var("HITOKU_TEST_PATTERN_LIBRARY");
    assert_eq!(
        config.anonymization.pattern_library.as_deref(),
        Some(overlay.path())
    );

    let mut engine = AnonymizationEngine::new(
        config.anonymization,
        Box::new(LexiconAnnotator::default()),
    )
    .unwrap();

    let anonymized = engine.anonymize("社員番号K123です").unwrap();
    assert!(anonymized.ends_with(">>です"));
    assert_eq!(count_tokens(&anonymized), 1);
    assert!(engine.vault().token_for("社員番号K123").is_some());
}

#[test]
fn test_overlay_extends_department_vocabulary() {
    let overlay = write_toml("[department]\ncores = ['宇宙']\n");
    let config_file = write_toml(&format!(
        "[anonymization]\npass_order = [\"department\"]\npattern_library = '{}'\n",
        overlay.path().display()
    ));

    let config = load_config(config_file.path()).unwrap();
    let mut engine = AnonymizationEngine::new(
        config.anonymization,
        Box::new(LexiconAnnotator::default()),
    )
    .unwrap();

    let anonymized = engine.anonymize("宇宙事業部と技術開発部").unwrap();
    assert_eq!(count_tokens(&anonymized), 2);
    assert!(engine.vault().token_for("宇宙事業部").is_some());
}

#[test]
fn test_missing_env_var_is_reported() {
    std::env::remove_var("HITOKU_TEST_UNSET_LIBRARY");
    let config_file = write_toml(
        r#"
[anonymization]
pattern_library = "${HITOKU_TEST_UNSET_LIBRARY}"
"#,
    );

    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("HITOKU_TEST_UNSET_LIBRARY"));
}
