//! Built-in host preflight rules.

pub mod accelerator;
pub mod numa;
pub mod platform;
pub mod power;
pub mod rhn;
pub mod root;

pub use accelerator::AcceleratorRule;
pub use numa::NumaRule;
pub use platform::PlatformRule;
pub use power::PowerRule;
pub use rhn::RhnRule;
pub use root::RootRule;

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::numa::parse_affinity;
    use super::platform::{is_rhel, parse_version, version_id};
    use super::*;
    use crate::port::{Rule, RuleLevel};

    #[test]
    fn affinity_is_read_from_lparcfg() {
        let text = "lparcfg 1.9\npartition_id=4\naffinity_score=83\n";
        assert_eq!(parse_affinity(text), Some(83));
        assert_eq!(parse_affinity("partition_id=4\n"), None);
    }

    #[test]
    fn numa_rule_compares_against_threshold() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "affinity_score=65").unwrap();

        let low = NumaRule::with_path(file.path(), 70);
        let ok = NumaRule::with_path(file.path(), 60);

        assert!(low.verify().is_err());
        assert!(ok.verify().is_ok());
        assert_eq!(low.level(), RuleLevel::Warning);
    }

    #[test]
    fn numa_rule_fails_without_lparcfg() {
        assert!(NumaRule::with_path("/nonexistent/lparcfg", 70).verify().is_err());
    }

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    const RHEL_96: &str = "NAME=\"Red Hat Enterprise Linux\"\nVERSION=\"9.6 (Plow)\"\nID=\"rhel\"\nVERSION_ID=\"9.6\"\n";

    #[test]
    fn os_release_is_parsed() {
        assert!(is_rhel(RHEL_96));
        assert!(is_rhel("ID=rhel\nVERSION_ID=10.0\n"));
        assert!(!is_rhel("NAME=\"Fedora Linux\"\nID=fedora\nVERSION_ID=41\n"));
        assert_eq!(version_id(RHEL_96), Some("9.6"));
        assert_eq!(version_id("ID=rhel\n"), None);
        assert_eq!(parse_version("9.6"), Some((9, 6)));
        assert_eq!(parse_version("10"), Some((10, 0)));
        assert_eq!(parse_version("nine"), None);
    }

    #[test]
    fn platform_rule_requires_a_recent_rhel() {
        let current = file_with(RHEL_96);
        let newer = file_with("ID=rhel\nVERSION_ID=10.1\n");
        let older = file_with("ID=\"rhel\"\nVERSION_ID=\"9.4\"\n");
        let fedora = file_with("ID=fedora\nVERSION_ID=41\n");
        let unversioned = file_with("ID=rhel\n");

        assert!(PlatformRule::with_path(current.path(), "9.6").verify().is_ok());
        assert!(PlatformRule::with_path(newer.path(), "9.6").verify().is_ok());

        let err = PlatformRule::with_path(older.path(), "9.6").verify().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported RHEL version: 9.4. Minimum required version is 9.6"
        );
        let err = PlatformRule::with_path(fedora.path(), "9.6").verify().unwrap_err();
        assert!(err.to_string().contains("only RHEL is supported"));
        let err = PlatformRule::with_path(unversioned.path(), "9.6").verify().unwrap_err();
        assert!(err.to_string().contains("unable to determine OS version"));
    }

    #[test]
    fn power_rule_checks_architecture_then_processor() {
        let power11 = file_with("processor\t: 0\ncpu\t\t: POWER11 (architected), altivec supported\n");
        let power10 = file_with("processor\t: 0\ncpu\t\t: POWER10 (architected), altivec supported\n");

        let ok = PowerRule::with_host("powerpc64", "powerpc64", "Power11", power11.path());
        assert!(ok.verify().is_ok());
        assert_eq!(ok.name(), "power");
        assert_eq!(ok.message(), "System is running on IBM Power11 (powerpc64)");

        let err = PowerRule::with_host("powerpc64", "powerpc64", "Power11", power10.path())
            .verify()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported IBM Power version: Power11 is required"
        );

        let err = PowerRule::with_host("powerpc64", "x86_64", "Power11", power11.path())
            .verify()
            .unwrap_err();
        assert!(err.to_string().contains("x86_64"));
    }

    #[test]
    fn rhn_rule_reads_registration_from_command_output() {
        let registered = RhnRule::with_command("echo", vec!["repo id  repo name".into()]);
        let unregistered = RhnRule::with_command(
            "sh",
            vec![
                "-c".into(),
                "echo 'This system is not registered with an entitlement server.' >&2".into(),
            ],
        );
        let broken = RhnRule::with_command("false", Vec::new());

        assert!(registered.verify().is_ok());
        assert_eq!(
            unregistered.verify().unwrap_err().to_string(),
            "system is not registered with RHN"
        );
        assert!(broken
            .verify()
            .unwrap_err()
            .to_string()
            .starts_with("failed to check registration status"));
        assert_eq!(registered.level(), RuleLevel::Error);
    }

    #[test]
    fn accelerator_rule_searches_listing_output() {
        let present = AcceleratorRule::with_command(
            "Spyre",
            "echo",
            vec!["0381:50:00.0 Processing accelerators: IBM Spyre Accelerator".into()],
        );
        let absent = AcceleratorRule::with_command("Spyre", "echo", vec!["nothing here".into()]);

        assert!(present.verify().is_ok());
        assert!(absent.verify().is_err());
        assert_eq!(present.name(), "accelerator");
    }

    #[test]
    fn root_rule_reports_error_level() {
        assert_eq!(RootRule.level(), RuleLevel::Error);
        assert!(RootRule.hint().is_some());
    }
}
