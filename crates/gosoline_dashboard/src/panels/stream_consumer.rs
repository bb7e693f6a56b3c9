use crate::metadata::MetadataStreamConsumer;
use crate::panel::{Panel, Unit};
use crate::panels::{PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, Statistic};

fn consumer_target(
    settings: &PanelSettings<'_>,
    consumer: &MetadataStreamConsumer,
    ref_id: &str,
    id: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(
        ref_id,
        &settings.resource_names.cloudwatch_namespace,
        metric_name,
        statistic,
    )
    .with_dimension("Consumer", &consumer.name)
    .with_id(id)
    .match_exact()
}

fn consumer_panel(title: impl Into<String>, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        &settings.resource_names.grafana_cloudwatch_datasource_name,
        settings.grid_pos,
    )
    .with_min("0")
    .with_span_nulls()
}

pub fn processed_count(consumer: MetadataStreamConsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        consumer_panel("Processed Count and Errors", settings)
            .with_color_overrides(&[("Processed", "super-light-blue"), ("Error", "dark-red")])
            .with_targets(vec![
                consumer_target(settings, &consumer, "A", "m0", "ProcessedCount", Statistic::Sum)
                    .with_alias("Processed")
                    .into(),
                consumer_target(settings, &consumer, "B", "m1", "Error", Statistic::Sum)
                    .with_alias("Error")
                    .into(),
            ])
    })
}

pub fn process_duration(consumer: MetadataStreamConsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        consumer_panel("Duration per consume operation", settings)
            .with_unit(Unit::Milliseconds)
            .with_targets(vec![consumer_target(
                settings,
                &consumer,
                "A",
                "m0",
                "Duration",
                Statistic::Average,
            )
            .with_alias("Average")
            .into()])
    })
}

/// Messages taken from and handed to the retry handler of the consumer.
pub fn retry_actions(consumer: MetadataStreamConsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        consumer_panel(format!("Retry Actions with type: {}", consumer.retry_type), settings)
            .with_targets(vec![
                consumer_target(settings, &consumer, "A", "m0", "RetryGetCount", Statistic::Sum)
                    .with_alias("Processed")
                    .into(),
                consumer_target(settings, &consumer, "B", "m1", "RetryPutCount", Statistic::Sum)
                    .with_alias("Error")
                    .into(),
            ])
    })
}
