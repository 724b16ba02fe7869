//! Prerequisite checks run before anything touches the filesystem.

use regex::Regex;
use std::io;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};

/// Interpreter names probed in order
pub const PYTHON_CANDIDATES: &[&str] = &[
    "python3.13",
    "python3.12",
    "python3.11",
    "python3",
    "python",
];

const REQUIRED_MAJOR: u32 = 3;
const MIN_MINOR: u32 = 11;

/// A Python interpreter that satisfies the version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Python {
    pub program: String,
    pub major: u32,
    pub minor: u32,
}

impl Python {
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

/// Confirm `git` can be started
pub fn check_git(runner: &dyn CommandRunner) -> Result<String> {
    match runner.run(&Invocation::new("git").arg("--version")) {
        Ok(output) if output.success() => Ok(output.stdout.trim().to_string()),
        Ok(output) => {
            tracing::debug!(detail = %output.failure_detail(), "git --version failed");
            Err(Error::GitNotFound)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::GitNotFound),
        Err(source) => Err(Error::Spawn {
            program: "git".to_string(),
            source,
        }),
    }
}

/// Select the first candidate interpreter reporting Python 3.x with x >= 11
pub fn find_python(runner: &dyn CommandRunner) -> Result<Python> {
    for candidate in PYTHON_CANDIDATES {
        let output = match runner.run(&Invocation::new(*candidate).arg("--version")) {
            Ok(output) if output.success() => output,
            Ok(_) | Err(_) => {
                tracing::debug!(candidate, "interpreter not usable");
                continue;
            }
        };

        // Python 2 printed its version on stderr
        let reported = format!("{}\n{}", output.stdout, output.stderr);
        let Some((major, minor)) = parse_python_version(&reported) else {
            tracing::debug!(candidate, %reported, "unrecognised version output");
            continue;
        };

        if meets_requirement(major, minor) {
            return Ok(Python {
                program: candidate.to_string(),
                major,
                minor,
            });
        }
        tracing::debug!(candidate, major, minor, "interpreter too old");
    }

    Err(Error::PythonNotFound {
        tried: PYTHON_CANDIDATES.iter().map(|c| c.to_string()).collect(),
    })
}

fn meets_requirement(major: u32, minor: u32) -> bool {
    major == REQUIRED_MAJOR && minor >= MIN_MINOR
}

/// Parse `Python <major>.<minor>[.<patch>...]`
fn parse_python_version(text: &str) -> Option<(u32, u32)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^Python (\d+)\.(\d+)").expect("static regex is valid")
    });

    let caps = pattern.captures(text)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;
    use rstest::rstest;
    use std::collections::HashMap;

    /// Answers `<program> --version` from a table; anything else is "not found"
    struct VersionTable(HashMap<&'static str, CommandOutput>);

    impl VersionTable {
        fn new(entries: &[(&'static str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(program, stdout)| {
                        (
                            *program,
                            CommandOutput {
                                code: Some(0),
                                stdout: stdout.to_string(),
                                stderr: String::new(),
                            },
                        )
                    })
                    .collect(),
            )
        }
    }

    impl CommandRunner for VersionTable {
        fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
            self.0
                .get(invocation.program_name().as_str())
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
        }
    }

    #[rstest]
    #[case("Python 3.12.1", Some((3, 12)))]
    #[case("Python 3.11.0rc1", Some((3, 11)))]
    #[case("Python 3.9", Some((3, 9)))]
    #[case("\nPython 2.7.18\n", Some((2, 7)))]
    #[case("python 3.12", None)]
    #[case("garbage", None)]
    fn test_parse_python_version(#[case] text: &str, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(parse_python_version(text), expected);
    }

    #[rstest]
    #[case(3, 11, true)]
    #[case(3, 13, true)]
    #[case(3, 10, false)]
    #[case(4, 11, false)]
    #[case(2, 17, false)]
    fn test_meets_requirement(#[case] major: u32, #[case] minor: u32, #[case] ok: bool) {
        assert_eq!(meets_requirement(major, minor), ok);
    }

    #[test]
    fn test_find_python_skips_old_interpreters() {
        let runner = VersionTable::new(&[
            ("python3", "Python 3.10.4\n"),
            ("python", "Python 3.11.2\n"),
        ]);
        let python = find_python(&runner).unwrap();
        assert_eq!(python.program, "python");
        assert_eq!(python.version(), "3.11");
    }

    #[test]
    fn test_find_python_prefers_earlier_candidates() {
        let runner = VersionTable::new(&[
            ("python3.12", "Python 3.12.0\n"),
            ("python3", "Python 3.13.0\n"),
        ]);
        assert_eq!(find_python(&runner).unwrap().program, "python3.12");
    }

    #[test]
    fn test_find_python_names_constraint_when_none_qualify() {
        let runner = VersionTable::new(&[("python3", "Python 3.8.10\n")]);
        let err = find_python(&runner).unwrap_err();
        assert!(err.to_string().contains("Python >= 3.11"));
        assert!(err.to_string().contains("python3.13"));
    }

    #[test]
    fn test_check_git() {
        let present = VersionTable::new(&[("git", "git version 2.43.0\n")]);
        assert_eq!(check_git(&present).unwrap(), "git version 2.43.0");

        let missing = VersionTable::new(&[]);
        assert!(matches!(check_git(&missing), Err(Error::GitNotFound)));
    }
}
