//! Capacity usage and throttling of a dynamodb table.

use crate::metadata::MetadataCloudAwsDynamodbTable;
use crate::panel::Panel;
use crate::panels::{PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, ExpressionTarget, PanelTarget, Statistic};

const DYNAMODB_NAMESPACE: &str = "AWS/DynamoDB";

const READ_OPERATIONS: [&str; 4] = ["GetItem", "Scan", "Query", "BatchGetItem"];
const WRITE_OPERATIONS: [&str; 4] = ["PutItem", "UpdateItem", "DeleteItem", "BatchWriteItem"];
const REF_IDS: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Clone, Copy)]
enum Capacity {
    Read,
    Write,
}

impl Capacity {
    fn name(self) -> &'static str {
        match self {
            Capacity::Read => "Read",
            Capacity::Write => "Write",
        }
    }

    fn operations(self) -> [&'static str; 4] {
        match self {
            Capacity::Read => READ_OPERATIONS,
            Capacity::Write => WRITE_OPERATIONS,
        }
    }
}

fn table_panel(
    title: &str,
    table: &MetadataCloudAwsDynamodbTable,
    settings: &PanelSettings<'_>,
) -> Panel {
    Panel::time_series(
        title,
        settings.resource_names.datasource_name_for_client(&table.aws_client_name),
        settings.grid_pos,
    )
    .with_min("0")
    .with_span_nulls()
}

/// Provisioned units against consumed units per second. Consumed capacity is reported as a sum
/// per period, so it is divided by the period length.
fn usage(table: MetadataCloudAwsDynamodbTable, capacity: Capacity) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let name = capacity.name();
        let table_target = |ref_id: &str, metric_name: String, statistic: Statistic| {
            CloudWatchTarget::new(ref_id, DYNAMODB_NAMESPACE, &metric_name, statistic)
                .with_dimension("TableName", &table.table_name)
                .match_exact()
        };

        table_panel(&format!("{name} Usage (average units/second)"), &table, settings)
            .with_color_overrides(&[("Provisioned", "dark-red"), ("Consumed", "super-light-blue")])
            .with_targets(vec![
                table_target("A", format!("Provisioned{name}CapacityUnits"), Statistic::Average)
                    .with_alias("Provisioned")
                    .with_id("m2")
                    .into(),
                table_target("B", format!("Consumed{name}CapacityUnits"), Statistic::Sum)
                    .with_id("m1")
                    .hidden()
                    .into(),
                ExpressionTarget::new("C", "m1/PERIOD(m1)", Statistic::Average)
                    .with_alias("Consumed")
                    .into(),
            ])
    })
}

fn throttles(table: MetadataCloudAwsDynamodbTable, capacity: Capacity) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let targets: Vec<PanelTarget> = capacity
            .operations()
            .into_iter()
            .zip(REF_IDS)
            .map(|(operation, ref_id)| {
                CloudWatchTarget::new(ref_id, DYNAMODB_NAMESPACE, "ThrottledRequests", Statistic::Sum)
                    .with_alias(operation)
                    .with_dimension("TableName", &table.table_name)
                    .with_dimension("Operation", operation)
                    .match_exact()
                    .into()
            })
            .collect();

        table_panel(
            &format!("{} throttled requests (count)", capacity.name()),
            &table,
            settings,
        )
        .with_targets(targets)
    })
}

pub fn read_usage(table: MetadataCloudAwsDynamodbTable) -> PanelFactory {
    usage(table, Capacity::Read)
}

pub fn read_throttles(table: MetadataCloudAwsDynamodbTable) -> PanelFactory {
    throttles(table, Capacity::Read)
}

pub fn write_usage(table: MetadataCloudAwsDynamodbTable) -> PanelFactory {
    usage(table, Capacity::Write)
}

pub fn write_throttles(table: MetadataCloudAwsDynamodbTable) -> PanelFactory {
    throttles(table, Capacity::Write)
}
