use std::path::Path;

use crate::toml_utils::ROOT_TOML;

#[test]
fn test_package_names_match_directory() {
    let mismatched_packages: Vec<_> = ROOT_TOML
        .member_cargo_tomls()
        .into_iter()
        .filter_map(|(member, cargo_toml)| {
            let directory_name = Path::new(&member).file_name()?.to_str()?.to_owned();
            match cargo_toml.package.name {
                Some(package_name) if package_name == directory_name => None,
                _ => Some(member),
            }
        })
        .collect();
    assert!(
        mismatched_packages.is_empty(),
        "The following crates have package names that do not match their directory names, or are \
         missing a name field: {mismatched_packages:?}."
    );
}
