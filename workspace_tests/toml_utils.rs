use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DependencyValue {
    Version(#[allow(dead_code)] String),
    Table { version: Option<String>, path: Option<String> },
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Package {
    version: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct WorkspaceFields {
    package: Package,
    members: Vec<String>,
    dependencies: BTreeMap<String, DependencyValue>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CargoToml {
    workspace: WorkspaceFields,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CratePackage {
    pub(crate) name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CrateCargoToml {
    pub(crate) package: CratePackage,
    dependencies: Option<BTreeMap<String, DependencyValue>>,
}

#[derive(Debug)]
pub(crate) struct LocalCrate {
    pub(crate) path: String,
    pub(crate) version: Option<String>,
}

pub(crate) static ROOT_TOML: LazyLock<CargoToml> = LazyLock::new(|| {
    toml::from_str(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../Cargo.toml")))
        .expect("The root Cargo.toml should be valid.")
});

impl CargoToml {
    pub(crate) fn members(&self) -> &Vec<String> {
        &self.workspace.members
    }

    pub(crate) fn workspace_version(&self) -> &str {
        &self.workspace.package.version
    }

    pub(crate) fn workspace_path_dependencies(&self) -> impl Iterator<Item = LocalCrate> + '_ {
        path_dependencies(&self.workspace.dependencies)
    }

    /// The Cargo.toml of every member, keyed by the member path.
    pub(crate) fn member_cargo_tomls(&self) -> BTreeMap<String, CrateCargoToml> {
        self.members().iter().map(|member| (member.clone(), read_cargo_toml(member))).collect()
    }
}

impl CrateCargoToml {
    /// Dependencies given by path instead of through the workspace.
    pub(crate) fn crate_path_dependencies(&self) -> Vec<LocalCrate> {
        self.dependencies.as_ref().map(|deps| path_dependencies(deps).collect()).unwrap_or_default()
    }
}

fn path_dependencies(
    dependencies: &BTreeMap<String, DependencyValue>,
) -> impl Iterator<Item = LocalCrate> + '_ {
    dependencies.values().filter_map(|value| match value {
        DependencyValue::Table { path: Some(path), version } => {
            Some(LocalCrate { path: path.clone(), version: version.clone() })
        }
        _ => None,
    })
}

pub(crate) fn read_cargo_toml(member: &str) -> CrateCargoToml {
    let cargo_toml_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(member).join("Cargo.toml");
    let cargo_toml_content = fs::read_to_string(&cargo_toml_path)
        .unwrap_or_else(|error| panic!("Failed to read {cargo_toml_path:?}: {error}"));
    toml::from_str(&cargo_toml_content)
        .unwrap_or_else(|error| panic!("Failed to parse {cargo_toml_path:?}: {error}"))
}
