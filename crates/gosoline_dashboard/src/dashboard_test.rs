use gosoline_dashboard_config::config::Orchestrator;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::dashboard::DashboardBuilder;
use crate::metadata::{MetadataCloudAwsKinesisRecordWriter, MetadataStreamConsumer};
use crate::panel::{
    AxisPlacement,
    CloudWatchOptions,
    GridPos,
    Panel,
    PanelOptions,
    PanelType,
    TooltipMode,
    GRID_WIDTH,
};
use crate::panels::PanelSettings;
use crate::resource_names::ResourceNames;
use crate::test_utils::{assert_json_eq, ecs_resource_names, full_metadata, kubernetes_resource_names};

fn builder_with_everything(
    resource_names: ResourceNames,
    orchestrator: Orchestrator,
) -> DashboardBuilder {
    let metadata = full_metadata();
    let target_groups = resource_names.target_groups.clone();
    let mut builder = DashboardBuilder::new(resource_names, orchestrator);

    builder.add_service_and_task().add_errors_and_warnings();
    for target_group in &target_groups {
        builder.add_elb_target_group(target_group);
    }
    builder.add_traefik_service();
    for route in &metadata.api_server.routes {
        builder.add_api_server_handler(&route.method, &route.path);
    }
    for server in &metadata.http_servers {
        for handler in &server.handlers {
            builder.add_http_server_handler(&server.name, handler);
        }
    }
    for consumer in &metadata.stream.consumers {
        builder.add_stream_consumer(consumer);
    }
    for kinsumer in &metadata.cloud.aws.kinesis.kinsumers {
        builder.add_kinesis_kinsumer(kinsumer).add_kinesis_stream(kinsumer);
    }
    for producer in &metadata.stream.producers {
        builder.add_stream_producer_daemon(producer);
    }
    for writer in &metadata.cloud.aws.kinesis.record_writers {
        builder.add_kinesis_record_writer(writer);
    }
    for queue in &metadata.cloud.aws.sqs.queues {
        builder.add_sqs_queue(queue);
    }
    for table in &metadata.cloud.aws.dynamodb.tables {
        builder.add_dynamodb_table(table);
    }
    builder
}

fn titles(panels: &[Panel]) -> Vec<&str> {
    panels.iter().map(|panel| panel.title.as_str()).collect()
}

#[rstest]
#[case::ecs(ecs_resource_names(), Orchestrator::Ecs)]
#[case::kubernetes(kubernetes_resource_names(), Orchestrator::Kubernetes)]
fn building_twice_yields_identical_json(
    #[case] resource_names: ResourceNames,
    #[case] orchestrator: Orchestrator,
) {
    let builder = builder_with_everything(resource_names, orchestrator);

    let first = serde_json::to_string(&builder.build()).unwrap();
    let second = serde_json::to_string(&builder.build()).unwrap();

    assert_eq!(first, second);
}

#[rstest]
#[case::ecs(ecs_resource_names(), Orchestrator::Ecs)]
#[case::kubernetes(kubernetes_resource_names(), Orchestrator::Kubernetes)]
fn panels_stay_within_the_grid(
    #[case] resource_names: ResourceNames,
    #[case] orchestrator: Orchestrator,
) {
    let dashboard = builder_with_everything(resource_names, orchestrator).build();

    for panel in &dashboard.panels {
        assert!(
            panel.grid_pos.x + panel.grid_pos.w <= GRID_WIDTH,
            "{} at {:?}",
            panel.title,
            panel.grid_pos
        );
        if panel.panel_type == PanelType::Row {
            assert_eq!((panel.grid_pos.x, panel.grid_pos.w, panel.grid_pos.h), (0, GRID_WIDTH, 1));
        }
    }
}

#[test]
fn rows_take_the_cursor_line_at_full_width() {
    let consumer = MetadataStreamConsumer {
        name: "orders".to_owned(),
        retry_enabled: true,
        retry_type: "sqs".to_owned(),
    };
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_stream_consumer(&consumer).add_stream_producer_daemon(&Default::default());

    let positions: Vec<GridPos> =
        builder.build().panels.iter().map(|panel| panel.grid_pos).collect();

    assert_eq!(
        positions,
        vec![
            GridPos::new(1, 24, 0, 0),
            GridPos::new(8, 12, 0, 24),
            GridPos::new(8, 12, 12, 24),
            GridPos::new(8, 12, 0, 36),
            // Rows keep the line of the cursor, even a half filled one.
            GridPos::new(1, 24, 0, 36),
            GridPos::new(8, 12, 0, 60),
            GridPos::new(8, 12, 12, 60),
        ]
    );
}

#[test]
fn logs_take_the_full_width() {
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_errors_and_warnings();
    let dashboard = builder.build();

    assert_eq!(titles(&dashboard.panels), vec![
        "Errors & Warnings",
        "Errors",
        "Warnings",
        "Error & Warning Logs"
    ]);
    assert_eq!(dashboard.panels[3].grid_pos, GridPos::new(16, 24, 0, 36));
}

#[rstest]
#[case::ecs(ecs_resource_names(), Orchestrator::Ecs, 0)]
#[case::kubernetes(kubernetes_resource_names(), Orchestrator::Kubernetes, 6)]
fn traefik_panels_depend_on_the_orchestrator(
    #[case] resource_names: ResourceNames,
    #[case] orchestrator: Orchestrator,
    #[case] expected_panels: usize,
) {
    let mut builder = DashboardBuilder::new(resource_names, orchestrator);
    builder.add_traefik_service();

    assert_eq!(builder.build().panels.len(), expected_panels);
}

#[rstest]
#[case::with_retries(true, 4)]
#[case::without_retries(false, 3)]
fn retry_panel_follows_the_consumer_settings(#[case] retry_enabled: bool, #[case] expected: usize) {
    let consumer = MetadataStreamConsumer {
        name: "orders".to_owned(),
        retry_enabled,
        retry_type: "sqs".to_owned(),
    };
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_stream_consumer(&consumer);

    let dashboard = builder.build();
    assert_eq!(dashboard.panels.len(), expected);
    assert_eq!(
        dashboard.panels.iter().any(|panel| panel.title == "Retry Actions with type: sqs"),
        retry_enabled
    );
}

#[test]
fn defaults_fill_only_unset_styling() {
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_panel(Box::new(|settings: &PanelSettings<'_>| {
        Panel::time_series("Custom", "cloudwatch", settings.grid_pos)
            .with_axis_placement(AxisPlacement::Left)
            .with_line_width(5)
    }));
    builder.add_panel(Box::new(|settings: &PanelSettings<'_>| {
        Panel::time_series("Plain", "cloudwatch", settings.grid_pos)
    }));

    let dashboard = builder.build();
    let custom = &dashboard.panels[0].field_config.defaults.custom;
    let plain = &dashboard.panels[1].field_config.defaults.custom;

    assert_eq!((custom.axis_placement, custom.line_width), (Some(AxisPlacement::Left), Some(5)));
    assert_eq!((plain.axis_placement, plain.line_width), (Some(AxisPlacement::Right), Some(2)));
    assert_eq!(
        dashboard.panels[1].options,
        Some(PanelOptions::CloudWatch(CloudWatchOptions {
            tooltip: crate::panel::Tooltip { mode: Some(TooltipMode::Multi) }
        }))
    );
}

#[rstest]
#[case::ecs(ecs_resource_names(), Orchestrator::Ecs, "gosoline-test-monitoring-grp-dashboard")]
#[case::kubernetes(kubernetes_resource_names(), Orchestrator::Kubernetes, "grp-dashboard")]
fn title_names_the_workload(
    #[case] resource_names: ResourceNames,
    #[case] orchestrator: Orchestrator,
    #[case] expected: &str,
) {
    assert_eq!(DashboardBuilder::new(resource_names, orchestrator).build().title, expected);
}

#[test]
fn service_group_adds_cpu_and_memory_per_container() {
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_service_and_task();

    assert_eq!(titles(&builder.build().panels), vec![
        "Service Resource Usage",
        "Service Utilization",
        "Running Task Count",
        "CPU Utilization (dashboard)",
        "Memory Utilization (dashboard)",
        "CPU Utilization (log_router)",
        "Memory Utilization (log_router)",
    ]);
}

#[test]
fn stream_row_titles_carry_the_shard_count() {
    let writer = MetadataCloudAwsKinesisRecordWriter {
        stream_name: "gosoline-test-monitoring-orders".to_owned(),
        open_shard_count: 4,
        ..Default::default()
    };
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_kinesis_record_writer(&writer).add_kinesis_stream(&writer);

    let dashboard = builder.build();
    let rows: Vec<&str> = dashboard
        .panels
        .iter()
        .filter(|panel| panel.panel_type == PanelType::Row)
        .map(|panel| panel.title.as_str())
        .collect();

    assert_eq!(rows, vec![
        "Kinesis RecordWriter on Stream: gosoline-test-monitoring-orders (4 Shards)",
        "Kinesis Stream: gosoline-test-monitoring-orders (4 Shards)",
    ]);
}

#[test]
fn dashboard_serializes_title_and_panels() {
    let mut builder = DashboardBuilder::new(kubernetes_resource_names(), Orchestrator::Kubernetes);
    builder.add_panel(crate::panels::row::row("Traefik"));

    assert_json_eq(
        &builder.build(),
        &json!({
            "title": "grp-dashboard",
            "panels": [{
                "datasource": "",
                "fieldConfig": {
                    "defaults": {"custom": {"axisPlacement": "right", "lineWidth": 2, "spanNulls": false}},
                    "overrides": []
                },
                "gridPos": {"h": 1, "w": 24, "x": 0, "y": 0},
                "options": null,
                "targets": [],
                "title": "Traefik",
                "type": "row"
            }]
        }),
        "Row panel JSON mismatch".to_owned(),
    );
}

#[test]
fn dashboard_file_is_pretty_json_ending_in_a_newline() {
    let mut builder = DashboardBuilder::new(ecs_resource_names(), Orchestrator::Ecs);
    builder.add_errors_and_warnings();
    let dashboard = builder.build();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.json");

    dashboard.write_to_file(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n  \"title\": \"gosoline-test-monitoring-grp-dashboard\""));
    assert!(written.ends_with("}\n"));
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["panels"].as_array().map(Vec::len), Some(4));
}
