use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::panel::{
    color_override,
    AxisPlacement,
    ElasticsearchOptions,
    GridPos,
    Panel,
    PanelOptions,
    PanelType,
    TooltipMode,
    GRID_WIDTH,
};
use crate::target::PrometheusTarget;
use crate::test_utils::assert_json_eq;

#[rstest]
#[case("Requests", "semi-dark-blue")]
#[case("CPU Average ", "light-green")]
fn color_override_matches_the_alias_exactly(#[case] alias: &str, #[case] color: &str) {
    let color_override = color_override(alias, color);

    assert_eq!(color_override.matcher.id, "byName");
    assert_eq!(color_override.matcher.options, alias);
    assert_json_eq(
        &color_override,
        &json!({
            "matcher": {"id": "byName", "options": alias},
            "properties": [{"id": "color", "value": {"fixedColor": color, "mode": "fixed"}}]
        }),
        "Color override JSON mismatch".to_owned(),
    );
}

#[test]
fn rows_span_the_grid_at_the_given_height() {
    let row = Panel::row("Load Balancer", 36);

    assert_eq!(row.grid_pos, GridPos::new(1, GRID_WIDTH, 0, 36));
    assert_eq!(row.panel_type, PanelType::Row);
    assert!(!row.collapsed);
}

#[test]
fn collapsed_rows_nest_their_panels() {
    let nested = Panel::time_series("Traffic", "cloudwatch", GridPos::at(0, 0));
    let row = Panel::collapsed_row("SQS: orders", 12, vec![nested]);

    let serialized = serde_json::to_value(&row).unwrap();
    assert_eq!(serialized["collapsed"], json!(true));
    assert_eq!(serialized["panels"][0]["title"], json!("Traffic"));
}

#[test]
fn defaults_keep_explicit_styling() {
    let panel = Panel::time_series("Errors", "cloudwatch", GridPos::at(0, 0))
        .with_axis_placement(AxisPlacement::Left)
        .with_line_width(4)
        .with_defaults();

    let custom = &panel.field_config.defaults.custom;
    assert_eq!(custom.axis_placement, Some(AxisPlacement::Left));
    assert_eq!(custom.line_width, Some(4));
}

#[test]
fn defaults_set_the_tooltip_of_cloudwatch_panels_only() {
    let logs = Panel::new("Logs", PanelType::Logs, "elasticsearch", GridPos::at(0, 0))
        .with_options(PanelOptions::Elasticsearch(ElasticsearchOptions::default()))
        .with_defaults();
    let metrics = Panel::time_series("Traffic", "cloudwatch", GridPos::at(0, 0)).with_defaults();

    assert_eq!(logs.options, Some(PanelOptions::Elasticsearch(ElasticsearchOptions::default())));
    let Some(PanelOptions::CloudWatch(options)) = metrics.options else {
        panic!("expected cloudwatch options");
    };
    assert_eq!(options.tooltip.mode, Some(TooltipMode::Multi));
}

#[test]
fn unset_fields_are_left_out_of_the_document() {
    let panel = Panel::new("Plain", PanelType::TimeSeries, "prometheus", GridPos::at(12, 0))
        .with_targets(vec![PrometheusTarget::new("A", "up", "Up").into()]);

    let serialized = serde_json::to_value(&panel).unwrap();
    assert_eq!(serialized["options"], json!(null));
    assert_eq!(serialized["fieldConfig"]["defaults"], json!({"custom": {"spanNulls": false}}));
    assert!(serialized.get("collapsed").is_none());
    assert!(serialized.get("panels").is_none());
}

#[test]
fn elasticsearch_options_show_details_newest_first() {
    assert_json_eq(
        &PanelOptions::Elasticsearch(ElasticsearchOptions::default()),
        &json!({
            "showTime": true,
            "showLabels": false,
            "showCommonLabels": false,
            "wrapLogMessage": false,
            "prettifyLogMessage": false,
            "enableLogDetails": true,
            "dedupStrategy": "none",
            "sortOrder": "Descending"
        }),
        "Elasticsearch options JSON mismatch".to_owned(),
    );
}

#[test]
#[should_panic(expected = "is used by more than one target")]
fn targets_are_validated_when_set() {
    Panel::time_series("Broken", "prometheus", GridPos::at(0, 0)).with_targets(vec![
        PrometheusTarget::new("A", "up", "Up").into(),
        PrometheusTarget::new("A", "up", "Up").into(),
    ]);
}
