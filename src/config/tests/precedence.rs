//! Tests for configuration layer precedence.

use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::build_config_from_layers;

#[rstest]
#[case::file_overrides_defaults(
    vec![("defaults", json!({"owner": "default-owner"})), ("file", json!({"owner": "file-owner"}))],
    "owner",
    "file-owner",
    "file should override default"
)]
#[case::environment_overrides_file(
    vec![("file", json!({"token": "file-token"})), ("environment", json!({"token": "env-token"}))],
    "token",
    "env-token",
    "environment should override file"
)]
#[case::cli_overrides_environment(
    vec![("environment", json!({"files": "a.js"})), ("cli", json!({"files": "b.js"}))],
    "files",
    "b.js",
    "CLI should override environment"
)]
#[case::base_branch_defaults_file_env_cli(
    vec![
        ("defaults", json!({"base_branch": "main"})),
        ("file", json!({"base_branch": "develop"})),
        ("environment", json!({"base_branch": "release"})),
        ("cli", json!({"base_branch": "trunk"}))
    ],
    "base_branch",
    "trunk",
    "CLI should win for base_branch"
)]
fn test_layer_precedence(
    #[case] layers: Vec<(&str, Value)>,
    #[case] field: &str,
    #[case] expected: &str,
    #[case] message: &str,
) {
    let config = build_config_from_layers(&layers);

    let actual = match field {
        "owner" => config.owner.as_deref(),
        "token" => config.token.as_deref(),
        "files" => config.files.as_deref(),
        "base_branch" => config.base_branch.as_deref(),
        _ => panic!("unknown field: {field}"),
    };

    assert_eq!(actual, Some(expected), "{message}");
}

#[rstest]
fn defaults_are_none_when_no_sources_provided() {
    let config = build_config_from_layers(&[("defaults", json!({"owner": null, "token": null}))]);

    assert!(config.owner.is_none(), "owner should be None");
    assert!(config.token.is_none(), "token should be None");
    assert!(config.files.is_none(), "files should be None");
    assert!(!config.publish, "publish should default to false when unset");
    assert_eq!(config.base_branch(), "main");
    assert_eq!(config.test_dir(), "tests");
}

#[rstest]
fn partial_overrides_preserve_lower_values() {
    let config = build_config_from_layers(&[
        (
            "file",
            json!({"owner": "acme", "repo": "widgets", "test_dir": "spec"}),
        ),
        ("cli", json!({"repo": "gadgets", "publish": true})),
    ]);

    assert_eq!(config.owner.as_deref(), Some("acme"));
    assert_eq!(config.repo.as_deref(), Some("gadgets"), "CLI should override repo");
    assert_eq!(config.test_dir(), "spec", "file test_dir should be preserved");
    assert!(config.publish, "CLI flag should be applied");
}
