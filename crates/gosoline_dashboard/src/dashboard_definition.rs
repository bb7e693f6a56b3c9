//! The dashboard of a single application, assembled from the metadata it publishes.

use std::collections::BTreeMap;

use gosoline_dashboard_config::config::Orchestrator;
use itertools::Itertools;
use tracing::info;

use crate::dashboard::{Dashboard, DashboardBuilder};
use crate::metadata::{ApplicationMetadata, KinesisStream};
use crate::resource_names::{DiscoveredResources, ResourceNames};

#[cfg(test)]
#[path = "dashboard_definition_test.rs"]
mod dashboard_definition_test;

/// Routes every application serves for its load balancer. They carry no useful traffic.
const IGNORED_API_SERVER_PATHS: [&str; 1] = ["/health"];

/// Builds the dashboard of an application. Collections are added sorted by name, so the result
/// does not depend on the order the metadata lists them in.
pub fn build_application_dashboard(
    resource_names: ResourceNames,
    orchestrator: Orchestrator,
    metadata: &ApplicationMetadata,
    discovered: &DiscoveredResources,
) -> Dashboard {
    let mut metadata = metadata.clone();
    metadata.fill_open_shard_counts(&discovered.stream_shard_counts);

    let target_groups = resource_names.target_groups.iter().cloned().sorted().collect_vec();
    let mut builder = DashboardBuilder::new(resource_names, orchestrator);

    builder.add_service_and_task().add_errors_and_warnings();

    for target_group in &target_groups {
        builder.add_elb_target_group(target_group);
    }
    builder.add_traefik_service();

    let routes = metadata
        .api_server
        .routes
        .iter()
        .filter(|route| !IGNORED_API_SERVER_PATHS.contains(&route.path.as_str()))
        .sorted_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)))
        .collect_vec();
    for route in &routes {
        builder.add_api_server_handler(&route.method, &route.path);
    }

    let mut handler_count = 0;
    for server in metadata.http_servers.iter().sorted_by(|a, b| a.name.cmp(&b.name)) {
        let handlers = server
            .handlers
            .iter()
            .sorted_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        for handler in handlers {
            builder.add_http_server_handler(&server.name, handler);
            handler_count += 1;
        }
    }

    let consumers =
        metadata.stream.consumers.iter().sorted_by(|a, b| a.name.cmp(&b.name)).collect_vec();
    for consumer in &consumers {
        builder.add_stream_consumer(consumer);
    }

    let kinesis = &metadata.cloud.aws.kinesis;
    let kinsumers = kinesis
        .kinsumers
        .iter()
        .sorted_by(|a, b| {
            a.stream_name_full
                .cmp(&b.stream_name_full)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.aws_client_name.cmp(&b.aws_client_name))
        })
        .collect_vec();
    for kinsumer in &kinsumers {
        builder.add_kinesis_kinsumer(kinsumer);
    }

    let producers = metadata
        .stream
        .producers
        .iter()
        .filter(|producer| producer.daemon_enabled)
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect_vec();
    for producer in &producers {
        builder.add_stream_producer_daemon(producer);
    }

    let record_writers = kinesis
        .record_writers
        .iter()
        .sorted_by(|a, b| {
            a.stream_name
                .cmp(&b.stream_name)
                .then_with(|| a.aws_client_name.cmp(&b.aws_client_name))
        })
        .collect_vec();
    for writer in &record_writers {
        builder.add_kinesis_record_writer(writer);
    }

    // A stream read and written by the application is shown once, as seen by its first reader in
    // sorted order.
    let mut streams: BTreeMap<String, KinesisStream> = BTreeMap::new();
    for stream in kinsumers
        .iter()
        .map(|kinsumer| KinesisStream::from_aware(*kinsumer))
        .chain(record_writers.iter().map(|writer| KinesisStream::from_aware(*writer)))
    {
        streams.entry(stream.stream_name_full.clone()).or_insert(stream);
    }
    for stream in streams.values() {
        builder.add_kinesis_stream(stream);
    }

    let queues = metadata
        .cloud
        .aws
        .sqs
        .queues
        .iter()
        .sorted_by(|a, b| a.queue_name_full.cmp(&b.queue_name_full))
        .collect_vec();
    for queue in &queues {
        builder.add_sqs_queue(queue);
    }

    let tables = metadata
        .cloud
        .aws
        .dynamodb
        .tables
        .iter()
        .sorted_by(|a, b| a.table_name.cmp(&b.table_name))
        .collect_vec();
    for table in &tables {
        builder.add_dynamodb_table(table);
    }

    info!(
        "Assembled dashboard with {} target groups, {} api routes, {} http handlers, {} stream \
         consumers, {} kinsumers, {} producer daemons, {} record writers, {} kinesis streams, {} \
         queues and {} tables.",
        target_groups.len(),
        routes.len(),
        handler_count,
        consumers.len(),
        kinsumers.len(),
        producers.len(),
        record_writers.len(),
        streams.len(),
        queues.len(),
        tables.len(),
    );

    builder.build()
}
