use pretty_assertions::assert_eq;
use serde_json::json;

use crate::target::{
    assert_valid_targets,
    CloudWatchTarget,
    ExpressionTarget,
    PanelTarget,
    PrometheusTarget,
    Statistic,
};
use crate::test_utils::assert_json_eq;

fn hidden_sum(ref_id: &str, id: &str) -> PanelTarget {
    CloudWatchTarget::new(ref_id, "AWS/Kinesis", "IncomingBytes", Statistic::Sum)
        .with_id(id)
        .hidden()
        .into()
}

#[test]
fn expressions_may_use_ids_of_earlier_targets() {
    assert_valid_targets(&[
        hidden_sum("A", "m0"),
        hidden_sum("B", "m1"),
        ExpressionTarget::new("C", "m0 / m1", Statistic::Maximum).into(),
    ]);
}

#[test]
#[should_panic(expected = "Reference id 'A' is used by more than one target.")]
fn reference_ids_are_unique_within_a_panel() {
    assert_valid_targets(&[
        PrometheusTarget::new("A", "up", "Up").into(),
        PrometheusTarget::new("A", "down", "Down").into(),
    ]);
}

#[test]
#[should_panic(expected = "references 'm1' before it is defined")]
fn expressions_cannot_reference_later_targets() {
    assert_valid_targets(&[
        hidden_sum("A", "m0"),
        ExpressionTarget::new("B", "m0 / m1", Statistic::Maximum).into(),
        hidden_sum("C", "m1"),
    ]);
}

#[test]
fn referenced_ids_skip_functions_and_numbers() {
    let expression =
        ExpressionTarget::new("D", "IF(m0, IF(m1, m0 / m1, 0), 0) * 5 * PERIOD(m2)", Statistic::Sum);

    assert_eq!(expression.referenced_ids(), vec!["m0", "m1", "m0", "m1", "m2"]);
}

#[test]
fn expression_targets_serialize_like_cloudwatch_queries() {
    let target: PanelTarget =
        ExpressionTarget::new("C", "m1/PERIOD(m1)", Statistic::Average).with_alias("Consumed").into();

    assert_json_eq(
        &target,
        &json!({
            "alias": "Consumed",
            "dimensions": {},
            "expression": "m1/PERIOD(m1)",
            "id": "",
            "hide": false,
            "matchExact": true,
            "metricName": "",
            "namespace": "",
            "period": "",
            "refId": "C",
            "region": "default",
            "statistics": ["Average"]
        }),
        "Expression target JSON mismatch".to_owned(),
    );
}

#[test]
fn prometheus_targets_enable_exemplars() {
    let target: PanelTarget = PrometheusTarget::new("A", "count(up)", "RunningTaskCount").into();

    assert_json_eq(
        &target,
        &json!({
            "exemplar": true,
            "expr": "count(up)",
            "hide": false,
            "interval": "",
            "legendFormat": "RunningTaskCount",
            "refId": "A"
        }),
        "Prometheus target JSON mismatch".to_owned(),
    );
}

#[test]
fn dimensions_serialize_in_name_order() {
    let target = CloudWatchTarget::new("A", "AWS/DynamoDB", "ThrottledRequests", Statistic::Sum)
        .with_dimension("TableName", "orders")
        .with_dimension("Operation", "GetItem");

    let serialized = serde_json::to_string(&target).unwrap();
    assert!(
        serialized.contains(r#""dimensions":{"Operation":"GetItem","TableName":"orders"}"#),
        "{serialized}"
    );
}
