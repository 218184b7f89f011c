// Manifest parsers
//
// Each parser turns one manifest format into the dependency names and the
// handful of metadata fields the detectors need. Parsers never touch the
// file system; detectors read the file and hand over its contents.

pub mod cargo_toml;
pub mod go_mod;
pub mod package_json;
pub mod pyproject;
pub mod requirements;

pub use cargo_toml::CargoManifest;
pub use go_mod::GoModule;
pub use package_json::PackageJson;
pub use pyproject::PyProject;

/// Appends `name` unless it is already present, keeping declaration order
pub(crate) fn push_dependency(deps: &mut Vec<String>, name: String) {
    if !deps.contains(&name) {
        deps.push(name);
    }
}
