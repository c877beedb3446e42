//! Context detection — turns the working directory and recent shell history
//! into a [`ContextFacts`] snapshot.
//!
//! Detection never fails.  Unreadable files, permission errors and missing
//! directories all degrade to absent facts and are only logged at `debug`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use tipline_config::AppConfig;
use tipline_core::{CommandCategory, ContextFacts, ProjectKind};

/// Environment variable naming the directory to inspect instead of the
/// process working directory.  Set for the detached daemon, whose own cwd is
/// `/`.
pub const CONTEXT_DIR_ENV: &str = "TIPLINE_CONTEXT_DIR";

const REPO_MARKER: &str = ".git";
const PYTHON_MANIFESTS: &[&str] = &["requirements.txt", "setup.py", "pyproject.toml", "Pipfile"];
const NODE_MANIFESTS: &[&str] = &["package.json"];
const CONTAINER_MANIFESTS: &[&str] = &["Dockerfile", "docker-compose.yml", "docker-compose.yaml"];

#[derive(Debug, Clone)]
pub struct ContextDetector {
    dir: PathBuf,
    history_file: Option<PathBuf>,
    history_lines: usize,
}

impl ContextDetector {
    pub fn new(dir: impl Into<PathBuf>, history_file: Option<PathBuf>, history_lines: usize) -> Self {
        Self {
            dir: dir.into(),
            history_file,
            history_lines,
        }
    }

    /// Build a detector for `dir` using the shell and history depth from
    /// `config` and the user's home directory.
    pub fn from_config(config: &AppConfig, dir: impl Into<PathBuf>) -> Self {
        let history_file = dirs::home_dir()
            .and_then(|home| history_file_for_shell(&config.shell(), &home));
        Self::new(dir, history_file, config.context.history_lines)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn detect(&self) -> ContextFacts {
        let mut facts = ContextFacts {
            in_repo_directory: self.dir.join(REPO_MARKER).is_dir(),
            ..ContextFacts::default()
        };

        if self.any_file(PYTHON_MANIFESTS) {
            facts.project_kinds.insert(ProjectKind::PythonLike);
        }
        if self.any_file(NODE_MANIFESTS) {
            facts.project_kinds.insert(ProjectKind::NodeLike);
        }
        if self.any_file(CONTAINER_MANIFESTS) {
            facts.project_kinds.insert(ProjectKind::ContainerLike);
        }

        facts.recent_command = self
            .recent_commands()
            .last()
            .and_then(|command| CommandCategory::classify(command));

        debug!(dir = %self.dir.display(), ?facts, "context detected");
        facts
    }

    /// Commands parsed from the last `history_lines` lines of the history
    /// file, oldest first.  Empty when there is no usable history.
    pub fn recent_commands(&self) -> Vec<String> {
        let Some(path) = &self.history_file else {
            return Vec::new();
        };

        match fs::read(path) {
            Ok(raw) => parse_history(&raw, self.history_lines),
            Err(err) => {
                debug!(path = %path.display(), %err, "shell history unavailable");
                Vec::new()
            }
        }
    }

    fn any_file(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.dir.join(name).is_file())
    }
}

/// History file for a shell name such as `/bin/zsh`.  Only zsh and bash are
/// recognised.
pub fn history_file_for_shell(shell: &str, home: &Path) -> Option<PathBuf> {
    if shell.contains("zsh") {
        Some(home.join(".zsh_history"))
    } else if shell.contains("bash") {
        Some(home.join(".bash_history"))
    } else {
        None
    }
}

/// Parse the trailing `limit` lines of raw history bytes into commands.
pub fn parse_history(raw: &[u8], limit: usize) -> Vec<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&[u8]> = raw.split(|byte| *byte == b'\n').collect();
    let start = lines.len().saturating_sub(limit);
    lines[start..]
        .iter()
        .filter_map(|line| parse_history_line(line))
        .collect()
}

/// Decode one history line, dropping invalid UTF-8, and strip a zsh
/// extended-history prefix (`: <epoch>:<elapsed>;command`).
pub fn parse_history_line(line: &[u8]) -> Option<String> {
    let decoded: String = String::from_utf8_lossy(line)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect();
    let mut command = decoded.trim();

    if command.contains(':') && command.contains(';') {
        if let Some((_, rest)) = command.split_once(';') {
            command = rest.trim();
        }
    }

    (!command.is_empty()).then(|| command.to_string())
}
