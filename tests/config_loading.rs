use std::io::Write;
use std::time::Duration;

use pedigree::config::{load_and_validate, load_or_default, ConfigFile};
use pedigree::errors::PedigreeError;
use pedigree::types::{DescendantMode, GatewayEnvironment};
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = config_file(contents);
    match load_and_validate(file.path()) {
        Err(PedigreeError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "'{msg}' does not mention '{needle}'")
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.gateway.environment, GatewayEnvironment::Integration);
    assert_eq!(cfg.gateway.resolved_base_url(), "https://api-integ.familysearch.org");
    assert_eq!(cfg.gateway.access_token_env, "FS_ACCESS_TOKEN");
    assert_eq!(cfg.gateway.timeout(), Duration::from_secs(30));

    let options = cfg.workflow.to_options();
    assert_eq!(options.generations, 2);
    assert_eq!(options.descendants, DescendantMode::Children);
    assert!(options.include_spouse);
    assert_eq!(options.portrait_concurrency, 1);
    assert!(!options.log_portrait_failures);
}

#[test]
fn test_full_file_is_parsed() {
    let file = config_file(
        r#"
[gateway]
environment = "production"
access_token = "secret"
timeout_secs = 5

[workflow]
generations = 4
descendants = "descendancy"
include_spouse = false
portrait_concurrency = 8
log_portrait_failures = true
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.gateway.resolved_base_url(), "https://api.familysearch.org");
    assert_eq!(cfg.gateway.resolved_access_token().as_deref(), Some("secret"));
    assert_eq!(cfg.gateway.timeout(), Duration::from_secs(5));

    let options = cfg.workflow.to_options();
    assert_eq!(options.generations, 4);
    assert_eq!(options.descendants, DescendantMode::Descendancy);
    assert!(!options.include_spouse);
    assert_eq!(options.portrait_concurrency, 8);
    assert!(options.log_portrait_failures);
}

#[test]
fn test_base_url_overrides_environment() {
    let file = config_file(
        r#"
[gateway]
environment = "beta"
base_url = "http://localhost:8080/"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.gateway.resolved_base_url(), "http://localhost:8080/");
}

#[test]
fn test_access_token_falls_back_to_env_var() {
    let var = "PEDIGREE_TEST_TOKEN_FALLBACK";
    let file = config_file(&format!("[gateway]\naccess_token_env = \"{var}\"\n"));
    let cfg = load_and_validate(file.path()).unwrap();

    // SAFETY: this variable name is unique to this test.
    unsafe { std::env::set_var(var, "from-env") };
    assert_eq!(cfg.gateway.resolved_access_token().as_deref(), Some("from-env"));

    unsafe { std::env::remove_var(var) };
    assert_eq!(cfg.gateway.resolved_access_token(), None);
}

#[test]
fn test_out_of_range_values_are_rejected() {
    expect_config_error("[workflow]\ngenerations = 0\n", "generations");
    expect_config_error("[workflow]\ngenerations = 9\n", "generations");
    expect_config_error("[workflow]\nportrait_concurrency = 0\n", "portrait_concurrency");
    expect_config_error("[gateway]\ntimeout_secs = 0\n", "timeout_secs");
    expect_config_error("[gateway]\nbase_url = \"not a url\"\n", "base_url");
    expect_config_error("[gateway]\nbase_url = \"ftp://example.org\"\n", "base_url");
}

#[test]
fn test_unknown_descendants_mode_is_a_toml_error() {
    let file = config_file("[workflow]\ndescendants = \"cousins\"\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(PedigreeError::TomlError(_))
    ));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Nope.toml");

    assert!(matches!(
        load_or_default(Some(missing.as_path())),
        Err(PedigreeError::IoError(_))
    ));
}

#[test]
fn test_default_config_is_valid() {
    let cfg = ConfigFile::default();
    assert_eq!(cfg.workflow.to_options(), pedigree::workflow::WorkflowOptions::default());
}
