use gosoline_dashboard_config::config::Orchestrator;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::metadata::{
    KinesisStream,
    MetadataCloudAwsDynamodbTable,
    MetadataCloudAwsKinesisKinsumer,
    MetadataCloudAwsSqsQueue,
};
use crate::orchestrator::queries_for;
use crate::panel::{GridPos, Panel, Unit};
use crate::panels::{
    container,
    dynamodb,
    elb,
    errors,
    kinesis,
    sqs,
    traefik,
    PanelFactory,
    PanelSettings,
};
use crate::resource_names::ResourceNames;
use crate::target::PanelTarget;
use crate::test_utils::{assert_json_eq, ecs_resource_names, kubernetes_resource_names};

fn render(factory: &PanelFactory, names: &ResourceNames, orchestrator: Orchestrator) -> Panel {
    factory(&PanelSettings {
        resource_names: names,
        grid_pos: GridPos::at(12, 8),
        orchestrator: queries_for(orchestrator),
    })
}

fn expressions(panel: &Panel) -> Vec<&str> {
    panel
        .targets
        .iter()
        .filter_map(|target| match target {
            PanelTarget::Expression(expression) => Some(expression.expression.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn errors_panel_document() {
    let names = ecs_resource_names();
    let factory: PanelFactory = Box::new(errors::errors);
    let panel = render(&factory, &names, Orchestrator::Ecs);

    assert_json_eq(
        &panel,
        &json!({
            "datasource": "cloudwatch-monitoring",
            "fieldConfig": {
                "defaults": {"custom": {"axisPlacement": "right", "lineWidth": 2, "spanNulls": false}},
                "overrides": [{
                    "matcher": {"id": "byName", "options": "Errors"},
                    "properties": [{"id": "color", "value": {"fixedColor": "dark-red", "mode": "fixed"}}]
                }]
            },
            "gridPos": {"h": 8, "w": 12, "x": 12, "y": 8},
            "options": {"tooltip": {}},
            "targets": [{
                "alias": "Errors",
                "dimensions": {},
                "expression": "",
                "id": "",
                "hide": false,
                "matchExact": false,
                "metricName": "error",
                "namespace": "gosoline/test/monitoring/grp-dashboard",
                "period": "",
                "refId": "A",
                "region": "default",
                "statistics": ["Sum"]
            }],
            "title": "Errors",
            "type": "timeseries"
        }),
        "Errors panel JSON mismatch".to_owned(),
    );
}

#[test]
fn factories_are_pure() {
    let names = ecs_resource_names();
    let factory = container::container_cpu("dashboard");

    assert_eq!(
        render(&factory, &names, Orchestrator::Ecs),
        render(&factory, &names, Orchestrator::Ecs)
    );
}

#[rstest]
#[case::default_client("default", "cloudwatch-monitoring")]
#[case::other_client("analytics", "cloudwatch-analytics")]
fn resource_panels_use_the_datasource_of_their_client(
    #[case] client_name: &str,
    #[case] expected: &str,
) {
    let names = ecs_resource_names();
    let queue = MetadataCloudAwsSqsQueue {
        aws_client_name: client_name.to_owned(),
        queue_name: "orders".to_owned(),
        queue_name_full: "gosoline-test-monitoring-grp-orders".to_owned(),
    };

    let panel = render(&sqs::traffic(queue), &names, Orchestrator::Ecs);

    assert_eq!(panel.datasource, expected);
    assert_eq!(panel.targets.len(), 3);
}

#[test]
fn consumed_capacity_is_derived_from_a_hidden_sum() {
    let names = ecs_resource_names();
    let table = MetadataCloudAwsDynamodbTable {
        table_name: "gosoline-test-monitoring-grp-orders".to_owned(),
        ..Default::default()
    };

    let panel = render(&dynamodb::write_usage(table), &names, Orchestrator::Ecs);

    assert_eq!(panel.title, "Write Usage (average units/second)");
    let PanelTarget::CloudWatch(consumed) = &panel.targets[1] else {
        panic!("expected a cloudwatch target, got {:?}", panel.targets[1]);
    };
    assert_eq!(consumed.metric_name, "ConsumedWriteCapacityUnits");
    assert!(consumed.hide);
    assert_eq!(consumed.id, "m1");
    assert_eq!(expressions(&panel), vec!["m1/PERIOD(m1)"]);
}

#[test]
fn throttle_panels_have_one_series_per_operation() {
    let names = ecs_resource_names();
    let panel =
        render(&dynamodb::read_throttles(Default::default()), &names, Orchestrator::Ecs);

    let operations: Vec<&str> = panel
        .targets
        .iter()
        .filter_map(|target| match target {
            PanelTarget::CloudWatch(target) => target.dimensions.get("Operation").map(String::as_str),
            _ => None,
        })
        .collect();
    assert_eq!(operations, vec!["GetItem", "Scan", "Query", "BatchGetItem"]);
}

#[test]
fn stream_limits_scale_with_the_open_shards() {
    let names = ecs_resource_names();
    let stream = KinesisStream {
        stream_name_full: "gosoline-test-monitoring-orders".to_owned(),
        client_name: "default".to_owned(),
        open_shard_count: 3,
    };

    let incoming = render(&kinesis::stream_incoming_bytes(stream.clone()), &names, Orchestrator::Ecs);
    let read = render(&kinesis::stream_get_records_bytes(stream.clone()), &names, Orchestrator::Ecs);
    let records = render(&kinesis::stream_incoming_records(stream), &names, Orchestrator::Ecs);

    assert_eq!(expressions(&incoming), vec!["3 * 1048576 * PERIOD(m0) * IF(m0, 1, 1)"]);
    assert_eq!(expressions(&read), vec!["3 * 2097152 * PERIOD(m0) * IF(m0, 1, 1)"]);
    assert_eq!(expressions(&records), vec!["3 * 1000 * PERIOD(m0) * IF(m0, 1, 1)"]);
    assert_eq!(incoming.field_config.defaults.unit, Some(Unit::DecBytes));
    assert_eq!(records.field_config.defaults.unit, None);
}

#[test]
fn kinsumer_read_operations_compare_calls_to_the_limit() {
    let names = ecs_resource_names();
    let kinsumer = MetadataCloudAwsKinesisKinsumer {
        stream_name_full: "gosoline-test-monitoring-orders".to_owned(),
        open_shard_count: 2,
        ..Default::default()
    };

    let panel = render(&kinesis::kinsumer_read_operations(kinsumer), &names, Orchestrator::Ecs);

    assert_eq!(expressions(&panel), vec![
        "2 * 5 * PERIOD(m1) * IF(m1, 1, 1)",
        "IF(m0, IF(m1, m0 / m1, 0), 0)"
    ]);
}

#[test]
fn service_utilization_marks_full_reservation() {
    let names = kubernetes_resource_names();
    let factory: PanelFactory = Box::new(container::service_utilization);
    let panel = render(&factory, &names, Orchestrator::Kubernetes);

    let defaults = &panel.field_config.defaults;
    assert_eq!(defaults.max.as_deref(), Some("200"));
    assert_eq!(defaults.unit, Some(Unit::Percent));
    let steps: Vec<i64> = defaults
        .thresholds
        .iter()
        .flat_map(|thresholds| &thresholds.steps)
        .map(|step| step.value)
        .collect();
    assert_eq!(steps, vec![0, 100]);

    let PanelTarget::Prometheus(cpu) = &panel.targets[0] else {
        panic!("expected a prometheus target");
    };
    assert_eq!(cpu.legend_format, "CPU Average {{container}}");
    assert_eq!(panel.datasource, "prometheus");
}

#[test]
fn traefik_status_overview_has_a_series_per_class() {
    let names = kubernetes_resource_names();
    let factory: PanelFactory = Box::new(traefik::http_status);
    let panel = render(&factory, &names, Orchestrator::Kubernetes);

    let PanelTarget::Prometheus(server_errors) = &panel.targets[3] else {
        panic!("expected a prometheus target");
    };
    assert_eq!(
        server_errors.expr,
        r#"sum(irate(traefik_service_requests_total{code=~"5.*",service="gosoline-grp-dashboard-8080@kubernetes"}[1m])) * 60 or vector(0)"#
    );
    assert_eq!(server_errors.legend_format, "HTTP 5XX");
    assert_eq!(panel.field_config.overrides.len(), 4);
}

#[test]
fn elb_status_series_query_the_target_group() {
    let names = ecs_resource_names();
    let panel = render(&elb::http_status(names.target_groups[0].clone()), &names, Orchestrator::Ecs);

    let metrics: Vec<&str> = panel
        .targets
        .iter()
        .filter_map(|target| match target {
            PanelTarget::CloudWatch(target) => {
                assert_eq!(target.dimensions["TargetGroup"], "targetgroup/grp-dashboard/4567");
                assert!(target.match_exact);
                Some(target.metric_name.as_str())
            }
            _ => None,
        })
        .collect();

    assert_eq!(metrics, vec![
        "HTTPCode_Target_2XX_Count",
        "HTTPCode_Target_3XX_Count",
        "HTTPCode_Target_4XX_Count",
        "HTTPCode_Target_5XX_Count",
    ]);
}
