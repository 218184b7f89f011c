//! `go.mod` parser

use super::push_dependency;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoModule {
    pub module: Option<String>,
    /// `major.minor` from the `go` directive
    pub go_version: Option<String>,
    /// Required module paths, versions discarded
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Other,
}

fn go_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^go\s+(\d+\.\d+)").expect("go directive regex is valid"))
}

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+)\s+v\S+").expect("require regex is valid"))
}

impl GoModule {
    pub fn parse(content: &str) -> Self {
        let mut module = GoModule::default();
        let mut block = Block::None;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            if block != Block::None {
                if trimmed.starts_with(')') {
                    block = Block::None;
                } else if block == Block::Require {
                    module.parse_requirement(trimmed);
                }
                continue;
            }

            if let Some(rest) = trimmed.strip_suffix('(') {
                block = if rest.trim() == "require" {
                    Block::Require
                } else {
                    Block::Other
                };
                continue;
            }

            if let Some(path) = trimmed.strip_prefix("module ") {
                let path = strip_comment(path).trim().trim_matches('"');
                if !path.is_empty() {
                    module.module = Some(path.to_string());
                }
            } else if let Some(caps) = go_directive_re().captures(trimmed) {
                module.go_version = Some(caps[1].to_string());
            } else if let Some(requirement) = trimmed.strip_prefix("require ") {
                module.parse_requirement(requirement.trim());
            }
        }

        module
    }

    fn parse_requirement(&mut self, line: &str) {
        if let Some(caps) = require_re().captures(strip_comment(line).trim()) {
            push_dependency(&mut self.requires, caps[1].to_string());
        }
    }

    /// Last segment of the module path, used as the binary name
    pub fn binary_name(&self) -> Option<&str> {
        self.module
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.requires.iter().any(|path| path.starts_with(prefix))
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}
