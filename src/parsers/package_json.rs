//! `package.json` parser

use super::push_dependency;
use serde::Deserialize;
use serde_json::{Map, Value};

type JsonObject = Map<String, Value>;

/// Top-level shape; non-object roots and dependency tables fail here
#[derive(Debug, Deserialize)]
struct RawPackageJson {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    engines: Option<JsonObject>,
    #[serde(default)]
    dependencies: Option<JsonObject>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<JsonObject>,
    #[serde(default)]
    scripts: Option<JsonObject>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageJson {
    pub name: Option<String>,
    pub node_engine: Option<String>,
    /// Union of `dependencies` and `devDependencies`, in declaration order
    pub dependencies: Vec<String>,
    /// Script names and commands, in declaration order
    pub scripts: Vec<(String, String)>,
}

impl PackageJson {
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let raw: RawPackageJson = serde_json::from_str(content)?;

        let name = raw
            .name
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let node_engine = raw
            .engines
            .as_ref()
            .and_then(|engines| engines.get("node"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let mut dependencies = Vec::new();
        for section in [&raw.dependencies, &raw.dev_dependencies]
            .into_iter()
            .flatten()
        {
            for name in section.keys() {
                push_dependency(&mut dependencies, name.clone());
            }
        }

        let scripts = raw
            .scripts
            .map(|scripts| {
                scripts
                    .into_iter()
                    .map(|(name, command)| {
                        let command = command.as_str().unwrap_or_default().to_string();
                        (name, command)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name,
            node_engine,
            dependencies,
            scripts,
        })
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.iter().any(|(script, _)| script == name)
    }

    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let content = r#"{
            "name": "api",
            "engines": { "node": ">=18" },
            "dependencies": { "express": "^4.18.0", "pg": "^8.0.0" },
            "devDependencies": { "jest": "^29.0.0", "pg": "^8.0.0" },
            "scripts": { "start": "node index.js", "worker": "node worker.js" }
        }"#;

        let pkg = PackageJson::parse(content).unwrap();
        assert_eq!(pkg.name.as_deref(), Some("api"));
        assert_eq!(pkg.node_engine.as_deref(), Some(">=18"));
        assert_eq!(pkg.dependencies, vec!["express", "pg", "jest"]);
        assert!(pkg.has_script("worker"));
        assert_eq!(pkg.script_names().collect::<Vec<_>>(), vec!["start", "worker"]);
    }

    #[test]
    fn test_parse_empty_object() {
        let pkg = PackageJson::parse("{}").unwrap();
        assert_eq!(pkg, PackageJson::default());
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let pkg = PackageJson::parse(r#"{"name": "  "}"#).unwrap();
        assert!(pkg.name.is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(PackageJson::parse("{ not json").is_err());
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(PackageJson::parse("[1, 2, 3]").is_err());
        assert!(PackageJson::parse("42").is_err());
        assert!(PackageJson::parse(r#""express""#).is_err());
    }

    #[test]
    fn test_non_object_dependencies_are_rejected() {
        assert!(PackageJson::parse(r#"{"dependencies": ["express"]}"#).is_err());
        assert!(PackageJson::parse(r#"{"devDependencies": "jest"}"#).is_err());
    }

    #[test]
    fn test_null_sections_are_absent() {
        let pkg = PackageJson::parse(r#"{"dependencies": null, "scripts": null}"#).unwrap();
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.scripts.is_empty());
    }
}
