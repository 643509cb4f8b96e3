use pedigree::cli::LogLevel;
use pedigree::logging::resolve_level;
use tracing::Level;

#[test]
fn test_cli_flag_beats_environment() {
    assert_eq!(resolve_level(Some(LogLevel::Warn), Some("trace")), Level::WARN);
    assert_eq!(resolve_level(Some(LogLevel::Trace), None), Level::TRACE);
}

#[test]
fn test_environment_value_is_used_without_flag() {
    assert_eq!(resolve_level(None, Some("debug")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some(" ERROR ")), Level::ERROR);
}

#[test]
fn test_unknown_or_missing_value_defaults_to_info() {
    assert_eq!(resolve_level(None, Some("chatty")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}
