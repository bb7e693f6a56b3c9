//! Panels of a producer that batches and aggregates messages in a background daemon.

use crate::metadata::MetadataStreamProducer;
use crate::panel::Panel;
use crate::panels::{PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, Statistic};

fn daemon_target(
    settings: &PanelSettings<'_>,
    producer: &MetadataStreamProducer,
    ref_id: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(
        ref_id,
        &settings.resource_names.cloudwatch_namespace,
        metric_name,
        statistic,
    )
    .with_dimension("ProducerDaemon", &producer.name)
}

fn daemon_panel(title: &str, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        &settings.resource_names.grafana_cloudwatch_datasource_name,
        settings.grid_pos,
    )
    .with_min("0")
}

pub fn daemon_sizes(producer: MetadataStreamProducer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        daemon_panel("Average Batch Size / Aggregation Size", settings).with_targets(vec![
            daemon_target(settings, &producer, "A", "BatchSize", Statistic::Average)
                .with_alias("Batch Size")
                .into(),
            daemon_target(settings, &producer, "B", "AggregateSize", Statistic::Average)
                .with_alias("Aggregate Size")
                .into(),
        ])
    })
}

pub fn message_count(producer: MetadataStreamProducer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        daemon_panel("Message Count", settings).with_targets(vec![daemon_target(
            settings,
            &producer,
            "A",
            "MessageCount",
            Statistic::Sum,
        )
        .with_alias("Message Count")
        .into()])
    })
}
