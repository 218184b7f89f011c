//! `Cargo.toml` parser

use super::push_dependency;
use toml::Table;

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "dev-dependencies"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CargoManifest {
    pub name: Option<String>,
    pub edition: Option<String>,
    pub rust_version: Option<String>,
    /// Lower-cased crate names from `[dependencies]` and `[dev-dependencies]`
    pub dependencies: Vec<String>,
}

impl CargoManifest {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let parsed: Table = toml::from_str(content)?;
        let mut manifest = CargoManifest::default();

        // `edition.workspace = true` and friends are tables; only literal strings count
        if let Some(package) = parsed.get("package").and_then(|v| v.as_table()) {
            manifest.name = string_field(package, "name");
            manifest.edition = string_field(package, "edition");
            manifest.rust_version = string_field(package, "rust-version");
        }

        for section in DEPENDENCY_SECTIONS {
            if let Some(deps) = parsed.get(*section).and_then(|v| v.as_table()) {
                for name in deps.keys() {
                    push_dependency(&mut manifest.dependencies, name.to_lowercase());
                }
            }
        }

        Ok(manifest)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

fn string_field(table: &Table, key: &str) -> Option<String> {
    table
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_and_dependencies() {
        let content = r#"
[package]
name = "api"
version = "0.1.0"
edition = "2021"
rust-version = "1.80"

[dependencies]
axum = "0.7"
tokio = { version = "1", features = ["full"] }

[dev-dependencies]
tempfile = "3"
axum = "0.7"
"#;
        let manifest = CargoManifest::parse(content).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("api"));
        assert_eq!(manifest.edition.as_deref(), Some("2021"));
        assert_eq!(manifest.rust_version.as_deref(), Some("1.80"));
        assert_eq!(manifest.dependencies, vec!["axum", "tokio", "tempfile"]);
        assert!(manifest.has_dependency("tokio"));
    }

    #[test]
    fn test_workspace_inherited_fields_are_ignored() {
        let content = r#"
[package]
name = "member"
edition.workspace = true
rust-version.workspace = true
"#;
        let manifest = CargoManifest::parse(content).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("member"));
        assert!(manifest.edition.is_none());
        assert!(manifest.rust_version.is_none());
    }

    #[test]
    fn test_workspace_root_without_package() {
        let manifest = CargoManifest::parse("[workspace]\nmembers = [\"a\"]\n").unwrap();
        assert_eq!(manifest, CargoManifest::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(CargoManifest::parse("[package\n").is_err());
    }
}
