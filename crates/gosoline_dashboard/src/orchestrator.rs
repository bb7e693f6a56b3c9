//! PromQL for the panels whose metrics depend on the scheduling platform.
//!
//! ECS containers are scraped by cadvisor and labelled with the ECS docker labels. Kubernetes
//! usage is attributed to the application's workload by joining against the kube-state-metrics
//! owner relabeling.

use gosoline_dashboard_config::config::Orchestrator;

use crate::resource_names::ResourceNames;

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;

const ECS_CONTAINER_NAME_LABEL: &str = "container_label_com_amazonaws_ecs_container_name";
const KUBERNETES_CONTAINER_LABEL: &str = "container";
const WORKLOAD_JOIN: &str = "* on(namespace,pod) group_left(workload, workload_type) \
                             namespace_workload_pod:kube_pod_owner:relabel";

/// The queries behind one resource usage panel, one per drawn series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUsageQueries {
    pub reserved: String,
    pub minimum: String,
    pub average: String,
    pub maximum: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceUtilizationQueries {
    pub cpu_average: String,
    pub memory_average: String,
}

/// Label schema and query dialect of one orchestrator.
pub trait OrchestratorQueries: Send + Sync {
    fn orchestrator(&self) -> Orchestrator;

    /// The label the series of different containers are told apart by.
    fn container_label(&self) -> &'static str;

    fn container_cpu(&self, names: &ResourceNames, container: &str) -> ResourceUsageQueries;

    fn container_memory(&self, names: &ResourceNames, container: &str) -> ResourceUsageQueries;

    /// Utilization relative to the reservation, in percent.
    fn service_utilization(&self, names: &ResourceNames) -> ServiceUtilizationQueries;

    fn running_task_count(&self, names: &ResourceNames) -> String;

    /// Whether requests reach the application through traefik.
    fn has_traefik(&self) -> bool;
}

pub struct EcsQueries;
pub struct KubernetesQueries;

static ECS_QUERIES: EcsQueries = EcsQueries;
static KUBERNETES_QUERIES: KubernetesQueries = KubernetesQueries;

pub fn queries_for(orchestrator: Orchestrator) -> &'static dyn OrchestratorQueries {
    match orchestrator {
        Orchestrator::Ecs => &ECS_QUERIES,
        Orchestrator::Kubernetes => &KUBERNETES_QUERIES,
    }
}

/// Matches the pods of the application's replica sets only. A plain prefix match would also pick
/// up the pods of `{pod}-worker` and the like.
pub fn kubernetes_pod_filter(namespace: &str, pod: &str) -> String {
    format!(r#"namespace="{namespace}", pod=~"^{pod}-[0-9a-f]+-[0-9a-z]+$""#)
}

pub fn ecs_task_definition_filter(cluster: &str, task_definition: &str) -> String {
    format!(
        r#"container_label_com_amazonaws_ecs_cluster="{cluster}", container_label_com_amazonaws_ecs_task_definition_family="{task_definition}""#
    )
}

pub fn ecs_container_filter(cluster: &str, task_definition: &str, container: &str) -> String {
    format!(
        r#"{}, {ECS_CONTAINER_NAME_LABEL}="{container}""#,
        ecs_task_definition_filter(cluster, task_definition)
    )
}

pub fn traefik_service_filter(service: &str) -> String {
    format!(r#"service="{service}""#)
}

impl OrchestratorQueries for EcsQueries {
    fn orchestrator(&self) -> Orchestrator {
        Orchestrator::Ecs
    }

    fn container_label(&self) -> &'static str {
        ECS_CONTAINER_NAME_LABEL
    }

    fn container_cpu(&self, names: &ResourceNames, container: &str) -> ResourceUsageQueries {
        let filter = ecs_container_filter(&names.ecs_cluster, &names.ecs_task_definition, container);
        let usage = |aggregation: &str| {
            format!(
                "{aggregation}(sum(rate(container_cpu_usage_seconds_total{{{filter}}}[$__rate_interval])) \
                 by (id))*1024"
            )
        };

        ResourceUsageQueries {
            reserved: format!("max(container_spec_cpu_shares{{{filter}}})"),
            minimum: usage("min"),
            average: usage("avg"),
            maximum: usage("max"),
        }
    }

    fn container_memory(&self, names: &ResourceNames, container: &str) -> ResourceUsageQueries {
        let filter = ecs_container_filter(&names.ecs_cluster, &names.ecs_task_definition, container);
        let label = self.container_label();
        let usage = |aggregation: &str| {
            format!("{aggregation} by ({label}) (container_memory_rss{{{filter}}})")
        };

        ResourceUsageQueries {
            reserved: format!("max(container_spec_memory_reservation_limit_bytes{{{filter}}})"),
            minimum: usage("min"),
            average: usage("avg"),
            maximum: usage("max"),
        }
    }

    fn service_utilization(&self, names: &ResourceNames) -> ServiceUtilizationQueries {
        let filter = ecs_task_definition_filter(&names.ecs_cluster, &names.ecs_task_definition);
        let label = self.container_label();

        ServiceUtilizationQueries {
            cpu_average: format!(
                "sum(rate(container_cpu_usage_seconds_total{{{filter}}}[$__rate_interval])) by \
                 ({label})/(sum(container_spec_cpu_shares{{{filter}}}) by ({label})/1024)*100"
            ),
            memory_average: format!(
                "sum(container_memory_rss{{{filter}}}) by \
                 ({label})/sum(container_spec_memory_reservation_limit_bytes{{{filter}}}) by \
                 ({label})*100"
            ),
        }
    }

    /// Every running task reports a load average for its first container.
    fn running_task_count(&self, names: &ResourceNames) -> String {
        let Some(container) = names.containers.first() else {
            panic!("Task definition {} has no containers.", names.ecs_task_definition);
        };
        let filter = ecs_container_filter(&names.ecs_cluster, &names.ecs_task_definition, container);
        format!("count(container_cpu_load_average_10s{{{filter}}})")
    }

    fn has_traefik(&self) -> bool {
        false
    }
}

impl KubernetesQueries {
    fn pod_filter(names: &ResourceNames) -> String {
        kubernetes_pod_filter(&names.kubernetes_namespace, &names.kubernetes_pod)
    }

    /// Sums `metric` per pod of the application's workload.
    fn per_pod(metric: &str, filter: &str) -> String {
        format!("sum({metric} {WORKLOAD_JOIN}{{{filter}}}) by (pod)")
    }
}

impl OrchestratorQueries for KubernetesQueries {
    fn orchestrator(&self) -> Orchestrator {
        Orchestrator::Kubernetes
    }

    fn container_label(&self) -> &'static str {
        KUBERNETES_CONTAINER_LABEL
    }

    // Kubernetes reports usage per pod, so the container only names the panel.
    fn container_cpu(&self, names: &ResourceNames, _container: &str) -> ResourceUsageQueries {
        let filter = Self::pod_filter(names);
        let usage = Self::per_pod(
            &format!(
                "node_namespace_pod_container:container_cpu_usage_seconds_total:sum_irate{{{filter}}}"
            ),
            &filter,
        );
        let requests = Self::per_pod(
            &format!(r#"kube_pod_container_resource_requests{{resource="cpu",{filter}}}"#),
            &filter,
        );

        ResourceUsageQueries {
            reserved: format!("max({requests})"),
            minimum: format!("min({usage})"),
            average: format!("avg({usage})"),
            maximum: format!("max({usage})"),
        }
    }

    fn container_memory(&self, names: &ResourceNames, _container: &str) -> ResourceUsageQueries {
        let filter = Self::pod_filter(names);
        let usage = Self::per_pod(
            &format!(r#"container_memory_working_set_bytes{{container!="", image!="", {filter}}}"#),
            &filter,
        );
        let limits = Self::per_pod(
            &format!(r#"kube_pod_container_resource_limits{{resource="memory",{filter}}}"#),
            &filter,
        );

        ResourceUsageQueries {
            reserved: format!("max({limits})"),
            minimum: format!("min({usage})"),
            average: format!("avg({usage})"),
            maximum: format!("max({usage})"),
        }
    }

    fn service_utilization(&self, names: &ResourceNames) -> ServiceUtilizationQueries {
        let filter = Self::pod_filter(names);
        let cpu_usage = Self::per_pod(
            &format!(
                "node_namespace_pod_container:container_cpu_usage_seconds_total:sum_irate{{{filter}}}"
            ),
            &filter,
        );
        let cpu_requests = Self::per_pod(
            &format!(r#"kube_pod_container_resource_requests{{resource="cpu", {filter}}}"#),
            &filter,
        );
        let memory_usage = Self::per_pod(
            &format!(r#"container_memory_working_set_bytes{{{filter}, container!="", image!=""}}"#),
            &filter,
        );

        ServiceUtilizationQueries {
            cpu_average: format!("avg({cpu_usage}/{cpu_requests}*100)"),
            memory_average: format!(
                "avg({memory_usage}/ on(pod) \
                 cluster:namespace:pod_memory:active:kube_pod_container_resource_requests{{resource=\"memory\",{filter}}})*100"
            ),
        }
    }

    /// Ready replicas of exactly the application's deployment.
    fn running_task_count(&self, names: &ResourceNames) -> String {
        format!(
            r#"sum(kube_deployment_status_replicas_ready{{namespace="{}", deployment="{}"}})"#,
            names.kubernetes_namespace, names.kubernetes_deployment
        )
    }

    fn has_traefik(&self) -> bool {
        true
    }
}
