//! Placeholder substitution for resource name patterns.
//!
//! Every `{key}` of the substitution map is replaced by its value; unknown placeholders stay as
//! they are. Keys are processed in sorted order. A value that itself contains `{other_key}` may
//! get substituted again if `other_key` sorts after its own key.

use std::collections::BTreeMap;

use crate::app_id::AppId;

#[cfg(test)]
#[path = "augment_test.rs"]
mod augment_test;

/// Fills `template` with the identity of `app_id`, overlaid by each of the additional maps in
/// order. Later maps win on key collisions.
pub fn augment(
    template: &str,
    app_id: &AppId,
    additional_replacements: &[&BTreeMap<String, String>],
) -> String {
    let mut values = app_id.replacements();
    for replacements in additional_replacements {
        values.extend(replacements.iter().map(|(key, value)| (key.clone(), value.clone())));
    }

    values.iter().fold(template.to_owned(), |output, (key, value)| {
        output.replace(&format!("{{{key}}}"), value)
    })
}
