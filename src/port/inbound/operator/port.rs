//! Unified operator capability surface for inbound adapters.

use super::config::ConfigurationOperator;
use super::deploy::DeploymentOperator;
use super::diagnostic::DiagnosticOperator;
use super::model::ModelOperator;
use super::template::TemplateOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort:
    ConfigurationOperator + DeploymentOperator + DiagnosticOperator + ModelOperator + TemplateOperator
{
}

impl<T> OperatorPort for T where
    T: ConfigurationOperator
        + DeploymentOperator
        + DiagnosticOperator
        + ModelOperator
        + TemplateOperator
{
}
