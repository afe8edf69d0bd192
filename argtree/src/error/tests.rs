use super::*;
use anyhow::{Result, ensure};
use rstest::rstest;

fn hook_error() -> CliError {
    CliError::Hook {
        command: "app add".to_owned(),
        stage: Stage::Before,
        source: "database locked".into(),
    }
}

#[rstest]
#[case::unknown_flag(CliError::UnknownFlag { flag: "--nope".to_owned() }, 2)]
#[case::missing_value(CliError::MissingFlagValue { flag: "-p".to_owned() }, 2)]
#[case::missing_flag(CliError::MissingRequiredFlag { flag: "token".to_owned() }, 2)]
#[case::missing_arg(CliError::MissingRequiredArgument { argument: "name".to_owned() }, 2)]
#[case::surplus(CliError::UnexpectedArgument { argument: "extra".to_owned() }, 2)]
#[case::stale(CliError::StaleTree { command: "app x".to_owned() }, 1)]
#[case::hook(hook_error(), 1)]
fn exit_codes_separate_usage_from_failures(#[case] err: CliError, #[case] code: u8) -> Result<()> {
    ensure!(err.exit_code() == code, "{err} mapped to {}", err.exit_code());
    ensure!(err.is_usage() == (code == 2), "usage classification of {err}");
    Ok(())
}

#[rstest]
fn invalid_value_exposes_bind_error() -> Result<()> {
    let err = CliError::InvalidValue {
        target: "--priority".to_owned(),
        source: BindError::InvalidInteger {
            value: "high".to_owned(),
        },
    };
    ensure!(
        err.to_string() == "invalid value for --priority: invalid integer 'high'",
        "unexpected message {err}"
    );
    ensure!(
        matches!(err.bind_error(), Some(BindError::InvalidInteger { .. })),
        "source not exposed"
    );
    Ok(())
}

#[rstest]
fn hook_error_keeps_source_unchanged() -> Result<()> {
    let err = hook_error();
    ensure!(
        err.to_string() == "before hook of 'app add' failed: database locked",
        "unexpected message {err}"
    );
    let source = std::error::Error::source(&err).map(ToString::to_string);
    ensure!(source.as_deref() == Some("database locked"), "source {source:?}");
    Ok(())
}

#[rstest]
fn configuration_errors_convert_transparently() -> Result<()> {
    let err: CliError = ConfigurationError::DuplicateFlag {
        command: "app".to_owned(),
        flag: "verbose".to_owned(),
    }
    .into();
    ensure!(
        err.to_string() == "duplicate flag --verbose on 'app'",
        "unexpected message {err}"
    );
    ensure!(err.exit_code() == 1, "configuration errors are not usage errors");
    Ok(())
}

#[rstest]
fn choice_error_lists_options() {
    let err = BindError::InvalidChoice {
        value: "xml".to_owned(),
        choices: vec!["json".to_owned(), "yaml".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "invalid value 'xml', expected one of: json, yaml"
    );
}
