use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::app_id::AppId;
use crate::augment::augment;

fn app_id() -> AppId {
    AppId::new("prj", "env", "fam", "grp", "app")
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn augments_identity_and_extras() {
    let extras = map(&[("metadata_domain", "example.com"), ("scheme", "https"), ("port", "1337")]);
    let result = augment(
        "{scheme}://{project}-{env}-{family}-{group}-{app}-static.{metadata_domain}:{port}",
        &app_id(),
        &[&extras],
    );
    assert_eq!(result, "https://prj-env-fam-grp-app-static.example.com:1337");
}

#[rstest]
#[case::unknown_placeholder("{project}-{unknown}", "prj-{unknown}")]
#[case::repeated("{app}/{app}", "app/app")]
#[case::no_placeholder("plain", "plain")]
#[case::unbalanced("{app", "{app")]
fn leaves_unmatched_text(#[case] template: &str, #[case] expected: &str) {
    assert_eq!(augment(template, &app_id(), &[]), expected);
}

#[test]
fn later_maps_win() {
    let first = map(&[("port", "1"), ("env", "overridden")]);
    let second = map(&[("port", "2")]);
    assert_eq!(augment("{env}:{port}", &app_id(), &[&first, &second]), "overridden:2");
}
