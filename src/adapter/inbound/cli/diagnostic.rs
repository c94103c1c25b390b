//! Miette-based error diagnostics for CLI error presentation.
//!
//! Converts crate errors into diagnostics with codes, help text, and one
//! related entry per failed component, so a failed layer reads as a list of
//! causes rather than one long line.

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError as CrateConfigError, Error, LayerError};

/// Configuration parse error pointing into the file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(strata::config))]
pub struct ConfigError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        name: impl AsRef<str>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: NamedSource::new(name, src.into()),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// One failed component of a layer.
#[derive(Debug, Error, Diagnostic)]
#[error("{component}: {reason}")]
#[diagnostic(code(strata::component))]
pub struct ComponentDiagnostic {
    pub component: String,
    pub reason: String,
}

/// A layer failed; the run stopped there.
#[derive(Debug, Error, Diagnostic)]
#[error("deployment stopped: layer {layer} failed ({} component(s))", .components.len())]
#[diagnostic(
    code(strata::deploy),
    help("components in earlier layers are still running; remove them before retrying")
)]
pub struct DeployFailed {
    pub layer: usize,
    #[related]
    pub components: Vec<ComponentDiagnostic>,
}

impl From<&LayerError> for DeployFailed {
    fn from(err: &LayerError) -> Self {
        Self {
            layer: err.layer,
            components: err
                .failures
                .iter()
                .map(|f| ComponentDiagnostic {
                    component: f.component.to_string(),
                    reason: f.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Any other failure, with an optional hint.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(strata::cli))]
pub struct CliError {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

impl CliError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

fn help_for(err: &Error) -> Option<&'static str> {
    match err {
        Error::Config(CrateConfigError::UnknownTemplate { .. }) => {
            Some("run `strata templates --hidden` to see every template")
        }
        Error::Config(CrateConfigError::ReadFile(_)) => {
            Some("pass --config or create ~/.strata/config.toml")
        }
        Error::Config(CrateConfigError::InvalidParam { .. }) => {
            Some("--params keys must name existing values, e.g. model.name=granite")
        }
        Error::InsufficientResources { .. } => {
            Some("free accelerators from other workloads or reduce the template's demand")
        }
        Error::Preflight(_) => Some("run `strata check` for details, or --skip-validation <name>"),
        Error::Runtime(_) => Some("check that the container engine is installed and on PATH"),
        Error::Model(_) => Some(
            "run `strata models list -t <template>` to see what is stored, or --skip-model-download",
        ),
        _ => None,
    }
}

/// Build the report shown for a failed command.
///
/// `config_source` is the `(path, text)` of the configuration file, used to
/// point at the offending span of a parse error.
#[must_use]
pub fn report(err: Error, config_source: Option<(&str, &str)>) -> Report {
    if let Error::Layer(layer) = &err {
        return Report::new(DeployFailed::from(layer));
    }

    if let (Error::Config(CrateConfigError::Parse(parse)), Some((name, text))) =
        (&err, config_source)
    {
        if let Some(span) = parse.span() {
            return Report::new(
                ConfigError::new(
                    parse.message().to_string(),
                    name,
                    text,
                    span.start,
                    span.len(),
                )
                .with_help("fix the TOML syntax, then run `strata config validate`"),
            );
        }
    }

    let mut diagnostic = CliError::new(err.to_string());
    if let Some(help) = help_for(&err) {
        diagnostic = diagnostic.with_help(help);
    }
    Report::new(diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentId;
    use crate::error::{ComponentError, ComponentFailure, ModelError, RuntimeError};

    #[test]
    fn layer_failure_relates_every_component() {
        let err = LayerError {
            layer: 2,
            failures: vec![
                ComponentFailure {
                    component: ComponentId::from("x"),
                    error: ComponentError::MissingSpec,
                },
                ComponentFailure {
                    component: ComponentId::from("y"),
                    error: ComponentError::Deploy(RuntimeError::Rejected("bad".into())),
                },
            ],
        };

        let diagnostic = DeployFailed::from(&err);

        assert_eq!(diagnostic.layer, 2);
        assert_eq!(diagnostic.components.len(), 2);
        assert!(diagnostic.components[1].to_string().starts_with("y: deploy failed"));
        assert!(diagnostic.to_string().contains("layer 2"));
    }

    #[test]
    fn unknown_template_gets_a_hint() {
        let err = Error::Config(CrateConfigError::UnknownTemplate { name: "nope".into() });
        let report = report(err, None);

        assert!(report.to_string().contains("'nope'"));
        assert!(report.help().is_some());
    }

    #[test]
    fn model_failures_point_at_the_skip_flag() {
        let err = Error::Model(ModelError::Download {
            model: "granite".into(),
            source: RuntimeError::Rejected("network".into()),
        });

        let help = help_for(&err).unwrap();

        assert!(help.contains("--skip-model-download"));
    }

    #[test]
    fn parse_errors_point_into_the_file() {
        let text = "[devices\nsource = 1\n";
        let parse = toml::from_str::<toml::Value>(text).unwrap_err();
        let report = report(Error::Config(CrateConfigError::Parse(parse)), Some(("config.toml", text)));

        assert!(report.source_code().is_some());
    }
}
