//! SMT tuning through `ppc64_cpu`.

use std::process::Command;

use crate::error::TuningError;
use crate::port::HostTuner;

/// Reads and sets the SMT level with the `ppc64_cpu` utility.
#[derive(Debug, Clone)]
pub struct SmtTuner {
    program: String,
}

impl Default for SmtTuner {
    fn default() -> Self {
        Self::new("ppc64_cpu")
    }
}

impl SmtTuner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, arg: &str) -> Result<String, TuningError> {
        let command = format!("{} {arg}", self.program);
        let output = Command::new(&self.program)
            .arg(arg)
            .output()
            .map_err(|e| TuningError::Command {
                command: command.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(TuningError::Command {
                command,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `SMT=<n>` (or `SMT is off`) from `ppc64_cpu --smt` output.
#[must_use]
pub fn parse_smt_output(output: &str) -> Option<u32> {
    let line = output.trim();
    if line.eq_ignore_ascii_case("SMT is off") {
        return Some(1);
    }
    line.strip_prefix("SMT=")?.trim().parse().ok()
}

impl HostTuner for SmtTuner {
    fn smt_level(&self) -> Result<u32, TuningError> {
        let output = self.run("--smt")?;
        parse_smt_output(&output).ok_or_else(|| TuningError::UnexpectedOutput {
            command: format!("{} --smt", self.program),
            output: output.trim().to_string(),
        })
    }

    fn set_smt_level(&self, level: u32) -> Result<(), TuningError> {
        self.run(&format!("--smt={level}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_smt_levels() {
        assert_eq!(parse_smt_output("SMT=8\n"), Some(8));
        assert_eq!(parse_smt_output("SMT is off"), Some(1));
        assert_eq!(parse_smt_output("garbage"), None);
    }

    #[test]
    fn unexpected_output_is_reported() {
        // `echo --smt` prints "--smt", which is not an SMT line.
        let err = SmtTuner::new("echo").smt_level().unwrap_err();
        assert!(matches!(err, TuningError::UnexpectedOutput { .. }));
    }

    #[test]
    fn missing_program_is_a_command_error() {
        let err = SmtTuner::new("/nonexistent/ppc64_cpu").smt_level().unwrap_err();
        assert!(matches!(err, TuningError::Command { .. }));
    }
}
