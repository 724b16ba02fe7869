#![allow(dead_code)]

use stackup::prompt::Prompter;
use stackup::runner::{CommandOutput, CommandRunner, Invocation};
use stackup::{HostEnv, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stands in for git, python and pip
///
/// Clones and venv creation materialise on disk so later stages (and later
/// runs) see the same state a real run would leave behind.
#[derive(Default)]
pub struct FakeHost {
    pub calls: RefCell<Vec<Invocation>>,
    pub without_git: bool,
    pub fail_install: Option<&'static str>,
    pub refuse_pull: Vec<PathBuf>,
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "program not found")
}

impl FakeHost {
    pub fn calls_matching(&self, prefix: &[&str]) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .map(|call| {
                let mut line = vec![call.program_name()];
                line.extend(call.args_lossy());
                line
            })
            .filter(|line| {
                line.len() >= prefix.len() && line.iter().zip(prefix).all(|(a, b)| a == b)
            })
            .collect()
    }

    pub fn clones(&self) -> Vec<Vec<String>> {
        self.calls_matching(&["git", "clone"])
    }

    pub fn pulls(&self) -> Vec<Vec<String>> {
        self.calls_matching(&["git", "-C"])
    }

    pub fn venv_creations(&self) -> Vec<Vec<String>> {
        self.calls_matching(&["python3.12", "-m", "venv"])
    }

    pub fn installs(&self) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.args_lossy().first().map(String::as_str) == Some("install"))
            .cloned()
            .collect()
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let program = invocation.program_name();
        let args = invocation.args_lossy();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match (program.as_str(), args.as_slice()) {
            ("git", _) if self.without_git => Err(not_found()),
            ("git", ["--version"]) => Ok(ok("git version 2.43.0\n")),
            ("git", ["clone", _url, dir]) => {
                fs::create_dir_all(Path::new(dir).join(".git"))?;
                fs::write(Path::new(dir).join("pyproject.toml"), "[project]\n")?;
                Ok(ok(""))
            }
            ("git", ["-C", dir, "pull", "--ff-only"]) => {
                if self.refuse_pull.iter().any(|p| p == Path::new(dir)) {
                    Ok(failed("fatal: Not possible to fast-forward, aborting.\n"))
                } else {
                    Ok(ok("Already up to date.\n"))
                }
            }
            ("python3.12", ["--version"]) => Ok(ok("Python 3.12.3\n")),
            ("python3.12", ["-m", "venv", path]) => {
                let bin = Path::new(path).join("bin");
                fs::create_dir_all(&bin)?;
                fs::write(bin.join("python"), "")?;
                fs::write(bin.join("pip"), "")?;
                Ok(ok(""))
            }
            (_, ["install", "-e", requirement]) => match self.fail_install {
                Some(name) if requirement.contains(name) => {
                    Ok(failed("ERROR: Could not build wheels\n"))
                }
                _ => Ok(ok("Successfully installed\n")),
            },
            _ => Err(not_found()),
        }
    }
}

/// Replays canned answers; panics if asked more than expected
pub struct ScriptedPrompter {
    interactive: bool,
    answers: VecDeque<String>,
    pub asked: usize,
}

impl ScriptedPrompter {
    pub fn piped() -> Self {
        Self {
            interactive: false,
            answers: VecDeque::new(),
            asked: 0,
        }
    }

    pub fn interactive(answers: &[&str]) -> Self {
        Self {
            interactive: true,
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: 0,
        }
    }

    fn next(&mut self, question: &str) -> String {
        self.asked += 1;
        assert!(self.interactive, "non-interactive prompter was asked: {question}");
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for: {question}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn ask_choice(&mut self, question: &str, _choices: &[&str]) -> Result<String> {
        Ok(self.next(question))
    }

    fn ask_path(&mut self, question: &str) -> Result<String> {
        Ok(self.next(question))
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        Ok(match self.next(question).as_str() {
            "y" => true,
            "n" => false,
            _ => default,
        })
    }
}

pub fn host(home: &Path, shell: &str) -> HostEnv {
    HostEnv {
        home: home.to_path_buf(),
        shell: Some(shell.to_string()),
        active_venv: None,
    }
}
