use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ResourceNamesError;

/// Identifies a single gosoline application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AppId {
    pub project: String,
    pub environment: String,
    pub family: String,
    pub group: String,
    pub application: String,
}

impl AppId {
    pub fn new(
        project: &str,
        environment: &str,
        family: &str,
        group: &str,
        application: &str,
    ) -> Self {
        Self {
            project: project.to_owned(),
            environment: environment.to_owned(),
            family: family.to_owned(),
            group: group.to_owned(),
            application: application.to_owned(),
        }
    }

    /// The placeholder keys of the identity, as used in name patterns.
    pub fn replacements(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("project".to_owned(), self.project.clone()),
            ("env".to_owned(), self.environment.clone()),
            ("family".to_owned(), self.family.clone()),
            ("group".to_owned(), self.group.clone()),
            ("app".to_owned(), self.application.clone()),
        ])
    }

    /// Fails if a field contains a placeholder delimiter, which would make templating ambiguous.
    pub fn validate(&self) -> Result<(), ResourceNamesError> {
        let fields = [
            ("project", &self.project),
            ("environment", &self.environment),
            ("family", &self.family),
            ("group", &self.group),
            ("application", &self.application),
        ];
        for (field, value) in fields {
            if value.contains('{') || value.contains('}') {
                return Err(ResourceNamesError::InvalidAppId { field, value: value.clone() });
            }
        }
        Ok(())
    }
}
