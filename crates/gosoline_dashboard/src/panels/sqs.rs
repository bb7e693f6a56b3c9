use crate::metadata::MetadataCloudAwsSqsQueue;
use crate::panel::{Panel, Unit};
use crate::panels::{PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, Statistic};

const SQS_NAMESPACE: &str = "AWS/SQS";

fn queue_target(
    queue: &MetadataCloudAwsSqsQueue,
    ref_id: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(ref_id, SQS_NAMESPACE, metric_name, statistic)
        .with_dimension("QueueName", &queue.queue_name_full)
}

fn queue_panel(
    title: &str,
    queue: &MetadataCloudAwsSqsQueue,
    settings: &PanelSettings<'_>,
) -> Panel {
    Panel::time_series(
        title,
        settings.resource_names.datasource_name_for_client(&queue.aws_client_name),
        settings.grid_pos,
    )
    .with_min("0")
    .with_span_nulls()
}

pub fn messages_visible(queue: MetadataCloudAwsSqsQueue) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        queue_panel("Messages In Queue", &queue, settings).with_targets(vec![queue_target(
            &queue,
            "A",
            "ApproximateNumberOfMessagesVisible",
            Statistic::Maximum,
        )
        .into()])
    })
}

/// Messages sent, received and deleted.
pub fn traffic(queue: MetadataCloudAwsSqsQueue) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        queue_panel("Traffic", &queue, settings).with_targets(vec![
            queue_target(&queue, "A", "NumberOfMessagesSent", Statistic::Sum).into(),
            queue_target(&queue, "B", "NumberOfMessagesReceived", Statistic::Sum).into(),
            queue_target(&queue, "C", "NumberOfMessagesDeleted", Statistic::Sum).into(),
        ])
    })
}

pub fn message_size(queue: MetadataCloudAwsSqsQueue) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        queue_panel("Message Size", &queue, settings).with_unit(Unit::Bytes).with_targets(vec![
            queue_target(&queue, "A", "SentMessageSize", Statistic::Average)
                .with_alias("Average")
                .into(),
            queue_target(&queue, "B", "SentMessageSize", Statistic::Maximum)
                .with_alias("Maximum")
                .into(),
        ])
    })
}
