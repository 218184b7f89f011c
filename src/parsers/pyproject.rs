//! `pyproject.toml` parser covering PEP 621 `[project]` and `[tool.poetry]`

use super::push_dependency;
use super::requirements::dependency_name;
use toml::{Table, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PyProject {
    pub name: Option<String>,
    /// `project.requires-python`
    pub requires_python: Option<String>,
    /// The `python` entry of `tool.poetry.dependencies`
    pub poetry_python: Option<String>,
    /// Lower-cased distribution names from every dependency group
    pub dependencies: Vec<String>,
}

impl PyProject {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let parsed: Table = toml::from_str(content)?;
        let mut pyproject = PyProject::default();

        if let Some(project) = parsed.get("project").and_then(|v| v.as_table()) {
            pyproject.name = non_empty(project.get("name").and_then(|v| v.as_str()));
            pyproject.requires_python =
                non_empty(project.get("requires-python").and_then(|v| v.as_str()));

            if let Some(deps) = project.get("dependencies").and_then(|v| v.as_array()) {
                pyproject.push_specs(deps);
            }

            if let Some(groups) = project
                .get("optional-dependencies")
                .and_then(|v| v.as_table())
            {
                for deps in groups.values().filter_map(|v| v.as_array()) {
                    pyproject.push_specs(deps);
                }
            }
        }

        let poetry = parsed
            .get("tool")
            .and_then(|v| v.get("poetry"))
            .and_then(|v| v.as_table());

        if let Some(poetry) = poetry {
            if pyproject.name.is_none() {
                pyproject.name = non_empty(poetry.get("name").and_then(|v| v.as_str()));
            }

            if let Some(deps) = poetry.get("dependencies").and_then(|v| v.as_table()) {
                pyproject.poetry_python = deps.get("python").and_then(constraint_of);
                pyproject.push_keys(deps);
            }

            if let Some(deps) = poetry.get("dev-dependencies").and_then(|v| v.as_table()) {
                pyproject.push_keys(deps);
            }

            if let Some(groups) = poetry.get("group").and_then(|v| v.as_table()) {
                for group in groups.values() {
                    if let Some(deps) = group.get("dependencies").and_then(|v| v.as_table()) {
                        pyproject.push_keys(deps);
                    }
                }
            }
        }

        Ok(pyproject)
    }

    /// Interpreter constraint, `requires-python` first
    pub fn python_constraint(&self) -> Option<&str> {
        self.requires_python
            .as_deref()
            .or(self.poetry_python.as_deref())
    }

    fn push_specs(&mut self, specs: &[Value]) {
        for spec in specs.iter().filter_map(|v| v.as_str()) {
            if let Some(name) = dependency_name(spec) {
                push_dependency(&mut self.dependencies, name);
            }
        }
    }

    fn push_keys(&mut self, deps: &Table) {
        for key in deps.keys() {
            let name = key.to_lowercase();
            if name != "python" {
                push_dependency(&mut self.dependencies, name);
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn constraint_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(Some(s)),
        Value::Table(t) => non_empty(t.get("version").and_then(|v| v.as_str())),
        _ => None,
    }
}
