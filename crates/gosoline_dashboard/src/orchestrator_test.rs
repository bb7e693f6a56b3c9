use gosoline_dashboard_config::config::Orchestrator;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::orchestrator::{ecs_container_filter, kubernetes_pod_filter, queries_for};
use crate::resource_names::ResourceNames;
use crate::test_utils::{ecs_resource_names, kubernetes_resource_names};

fn deployment_names(namespace: &str, deployment: &str) -> ResourceNames {
    ResourceNames {
        kubernetes_namespace: namespace.to_owned(),
        kubernetes_deployment: deployment.to_owned(),
        kubernetes_pod: deployment.to_owned(),
        containers: vec!["app".to_owned()],
        ..Default::default()
    }
}

#[test]
fn running_task_count_matches_the_exact_deployment() {
    let query = queries_for(Orchestrator::Kubernetes)
        .running_task_count(&deployment_names("test-namespace", "gateway"));

    assert!(query.contains("sum(kube_deployment_status_replicas_ready"), "{query}");
    assert!(query.contains(r#"deployment="gateway""#), "{query}");
    assert!(query.contains(r#"namespace="test-namespace""#), "{query}");
    assert!(!query.contains("gateway-.*"), "{query}");
    assert!(!query.contains("kube_pod_info"), "{query}");
}

#[test]
fn similarly_prefixed_deployments_do_not_share_a_query() {
    let queries = queries_for(Orchestrator::Kubernetes);
    let gateway = queries.running_task_count(&deployment_names("test-ns", "gateway"));
    let gateway_abc = queries.running_task_count(&deployment_names("test-ns", "gateway-abc"));

    assert_ne!(gateway, gateway_abc);
    assert!(gateway_abc.contains(r#"deployment="gateway-abc""#), "{gateway_abc}");
    assert!(!gateway.contains("gateway-abc"), "{gateway}");
}

#[test]
fn pod_filter_is_anchored_to_replica_set_pods() {
    assert_eq!(
        kubernetes_pod_filter("test-ns", "gateway"),
        r#"namespace="test-ns", pod=~"^gateway-[0-9a-f]+-[0-9a-z]+$""#
    );
}

#[test]
fn ecs_container_filter_quotes_every_value_once() {
    assert_eq!(
        ecs_container_filter("test", "gosoline-test-monitoring-grp-dashboard", "dashboard"),
        "container_label_com_amazonaws_ecs_cluster=\"test\", \
         container_label_com_amazonaws_ecs_task_definition_family=\"gosoline-test-monitoring-grp-\
         dashboard\", container_label_com_amazonaws_ecs_container_name=\"dashboard\""
    );
}

#[test]
fn ecs_running_task_count_uses_the_first_container() {
    let query = queries_for(Orchestrator::Ecs).running_task_count(&ecs_resource_names());
    assert!(query.starts_with("count(container_cpu_load_average_10s{"), "{query}");
    assert!(query.contains(r#"container_label_com_amazonaws_ecs_container_name="dashboard""#));
    assert!(!query.contains("log_router"), "{query}");
}

#[test]
#[should_panic(expected = "has no containers")]
fn ecs_running_task_count_requires_a_container() {
    let names = ResourceNames { containers: vec![], ..ecs_resource_names() };
    queries_for(Orchestrator::Ecs).running_task_count(&names);
}

#[test]
fn ecs_container_queries_select_the_given_container() {
    let names = ecs_resource_names();
    let cpu = queries_for(Orchestrator::Ecs).container_cpu(&names, "log_router");
    let filter = ecs_container_filter(&names.ecs_cluster, &names.ecs_task_definition, "log_router");

    assert_eq!(cpu.reserved, format!("max(container_spec_cpu_shares{{{filter}}})"));
    assert_eq!(
        cpu.average,
        format!(
            "avg(sum(rate(container_cpu_usage_seconds_total{{{filter}}}[$__rate_interval])) by \
             (id))*1024"
        )
    );

    let memory = queries_for(Orchestrator::Ecs).container_memory(&names, "log_router");
    assert_eq!(
        memory.maximum,
        format!(
            "max by (container_label_com_amazonaws_ecs_container_name) \
             (container_memory_rss{{{filter}}})"
        )
    );
}

#[test]
fn kubernetes_usage_is_attributed_to_the_workload() {
    let names = kubernetes_resource_names();
    let filter = kubernetes_pod_filter(&names.kubernetes_namespace, &names.kubernetes_pod);
    let cpu = queries_for(Orchestrator::Kubernetes).container_cpu(&names, "dashboard");

    assert_eq!(
        cpu.minimum,
        format!(
            "min(sum(node_namespace_pod_container:container_cpu_usage_seconds_total:sum_irate{{{filter}}} \
             * on(namespace,pod) group_left(workload, workload_type) \
             namespace_workload_pod:kube_pod_owner:relabel{{{filter}}}) by (pod))"
        )
    );
    assert!(cpu.reserved.contains(r#"kube_pod_container_resource_requests{resource="cpu","#));

    let memory = queries_for(Orchestrator::Kubernetes).container_memory(&names, "dashboard");
    assert!(memory.reserved.contains(r#"kube_pod_container_resource_limits{resource="memory","#));
}

#[rstest]
#[case::ecs(Orchestrator::Ecs, "container_label_com_amazonaws_ecs_container_name", false)]
#[case::kubernetes(Orchestrator::Kubernetes, "container", true)]
fn orchestrator_traits(
    #[case] orchestrator: Orchestrator,
    #[case] container_label: &str,
    #[case] has_traefik: bool,
) {
    let queries = queries_for(orchestrator);
    assert_eq!(queries.orchestrator(), orchestrator);
    assert_eq!(queries.container_label(), container_label);
    assert_eq!(queries.has_traefik(), has_traefik);
}

#[test]
fn service_utilization_groups_by_container_label() {
    let names = ecs_resource_names();
    let utilization = queries_for(Orchestrator::Ecs).service_utilization(&names);
    assert!(utilization.cpu_average.ends_with(
        "by (container_label_com_amazonaws_ecs_container_name)/1024)*100"
    ));
    assert!(utilization.memory_average.ends_with(
        "by (container_label_com_amazonaws_ecs_container_name)*100"
    ));
    assert!(!utilization.cpu_average.contains("container_label_com_amazonaws_ecs_container_name=\""));
}
