use std::collections::BTreeMap;

use gosoline_dashboard_config::config::{Orchestrator, ResourceNamePatterns};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app_id::AppId;
use crate::augment::augment;
use crate::errors::ResourceNamesError;

#[cfg(test)]
#[path = "resource_names_test.rs"]
mod resource_names_test;

/// The client name of resources that live in the account of the default datasource.
pub const DEFAULT_CLIENT_NAME: &str = "default";

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbTargetGroup {
    pub load_balancer: String,
    pub target_group: String,
}

/// Facts about a deployed application that only the cluster APIs know.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveredResources {
    pub containers: Vec<String>,
    pub ecs_task_definition: String,
    pub target_groups: Vec<ElbTargetGroup>,
    pub stream_shard_counts: BTreeMap<String, u32>,
}

/// Every backend identifier the panels of one application reference. Only the fields of the
/// active orchestrator are filled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceNames {
    pub cloudwatch_namespace: String,
    pub containers: Vec<String>,
    pub ecs_cluster: String,
    pub ecs_service: String,
    pub ecs_task_definition: String,
    pub environment: String,
    pub grafana_cloudwatch_datasource_name: String,
    pub grafana_elasticsearch_datasource_name: String,
    pub kubernetes_namespace: String,
    pub kubernetes_pod: String,
    pub kubernetes_deployment: String,
    pub target_groups: Vec<ElbTargetGroup>,
    pub traefik_service_name: String,
}

impl ResourceNames {
    /// Resolves the name patterns for `app_id` and combines them with the discovered resources.
    /// Fails if a name the orchestrator needs ends up empty.
    pub fn from_patterns(
        orchestrator: Orchestrator,
        patterns: &ResourceNamePatterns,
        app_id: &AppId,
        discovered: &DiscoveredResources,
    ) -> Result<Self, ResourceNamesError> {
        app_id.validate()?;
        let resolve = |pattern: &str| augment(pattern, app_id, &[]);

        let mut names = Self {
            cloudwatch_namespace: resolve(&patterns.cloudwatch_namespace),
            containers: discovered.containers.clone(),
            environment: app_id.environment.clone(),
            grafana_cloudwatch_datasource_name: resolve(&patterns.grafana_cloudwatch_datasource),
            grafana_elasticsearch_datasource_name: resolve(
                &patterns.grafana_elasticsearch_datasource,
            ),
            ..Default::default()
        };

        match orchestrator {
            Orchestrator::Ecs => {
                names.ecs_cluster = resolve(&patterns.ecs_cluster);
                names.ecs_service = resolve(&patterns.ecs_service);
                names.ecs_task_definition = discovered.ecs_task_definition.clone();
                names.target_groups = discovered.target_groups.clone();
            }
            Orchestrator::Kubernetes => {
                names.kubernetes_namespace = resolve(&patterns.kubernetes_namespace);
                names.kubernetes_pod = resolve(&patterns.kubernetes_pod);
                names.kubernetes_deployment = resolve(&patterns.kubernetes_deployment);
                names.traefik_service_name = resolve(&patterns.traefik_service_name);
            }
        }

        names.validate_for(orchestrator)?;
        debug!("Resolved resource names for {orchestrator}: {names:?}");
        Ok(names)
    }

    /// Checks that the names the orchestrator's panels dereference are present.
    pub fn validate_for(&self, orchestrator: Orchestrator) -> Result<(), ResourceNamesError> {
        let required: Vec<(&'static str, bool)> = match orchestrator {
            Orchestrator::Ecs => vec![
                ("ecs_cluster", self.ecs_cluster.is_empty()),
                ("ecs_task_definition", self.ecs_task_definition.is_empty()),
                ("containers", self.containers.is_empty()),
            ],
            Orchestrator::Kubernetes => vec![
                ("kubernetes_namespace", self.kubernetes_namespace.is_empty()),
                ("kubernetes_pod", self.kubernetes_pod.is_empty()),
                ("kubernetes_deployment", self.kubernetes_deployment.is_empty()),
            ],
        };

        match required.into_iter().find(|(_, missing)| *missing) {
            Some((field, _)) => Err(ResourceNamesError::MissingName { field, orchestrator }),
            None => Ok(()),
        }
    }

    /// The cloudwatch datasource holding the metrics of resources created by `client_name`.
    pub fn datasource_name_for_client(&self, client_name: &str) -> String {
        if client_name == DEFAULT_CLIENT_NAME {
            return self.grafana_cloudwatch_datasource_name.clone();
        }

        format!("cloudwatch-{client_name}")
    }
}
