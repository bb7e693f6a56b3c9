use crate::toml_utils::{LocalCrate, ROOT_TOML};

#[test]
fn test_path_dependencies_are_members() {
    let non_member_path_crates: Vec<_> = ROOT_TOML
        .workspace_path_dependencies()
        .filter(|LocalCrate { path, .. }| !ROOT_TOML.members().contains(path))
        .collect();
    assert!(
        non_member_path_crates.is_empty(),
        "The following crates are path dependencies but not members of the workspace: \
         {non_member_path_crates:?}."
    );
}

#[test]
fn test_version_alignment() {
    let workspace_version = ROOT_TOML.workspace_version();
    let crates_with_incorrect_version: Vec<_> = ROOT_TOML
        .workspace_path_dependencies()
        .filter(|LocalCrate { version, .. }| version.as_deref() != Some(workspace_version))
        .collect();
    assert!(
        crates_with_incorrect_version.is_empty(),
        "The following crates have versions different from the workspace version \
         '{workspace_version}': {crates_with_incorrect_version:?}."
    );
}

#[test]
fn test_members_depend_on_local_crates_through_the_workspace() {
    let crates_with_path_dependencies: Vec<_> = ROOT_TOML
        .member_cargo_tomls()
        .into_iter()
        .filter_map(|(member, cargo_toml)| {
            let path_dependencies = cargo_toml.crate_path_dependencies();
            (!path_dependencies.is_empty()).then_some((member, path_dependencies))
        })
        .collect();
    assert!(
        crates_with_path_dependencies.is_empty(),
        "The following crates have path dependencies instead of workspace ones: \
         {crates_with_path_dependencies:?}."
    );
}
