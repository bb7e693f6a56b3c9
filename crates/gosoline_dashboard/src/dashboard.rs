//! Collects panel factories in order and lays their panels out on the dashboard grid.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gosoline_dashboard_config::config::Orchestrator;
use serde::Serialize;
use tracing::debug;

use crate::metadata::{
    KinesisStream,
    KinesisStreamAware,
    MetadataCloudAwsDynamodbTable,
    MetadataCloudAwsKinesisKinsumer,
    MetadataCloudAwsKinesisRecordWriter,
    MetadataCloudAwsSqsQueue,
    MetadataHttpServerHandler,
    MetadataStreamConsumer,
    MetadataStreamProducer,
};
use crate::orchestrator::{queries_for, OrchestratorQueries};
use crate::panel::{GridPos, Panel, GRID_WIDTH};
use crate::panels::http_server::HttpServerRoute;
use crate::panels::row::row;
use crate::panels::{
    api_server,
    container,
    dynamodb,
    elb,
    errors,
    http_server,
    kinesis,
    logs,
    sqs,
    stream_consumer,
    stream_producer,
    traefik,
    PanelFactory,
    PanelSettings,
};
use crate::resource_names::{ElbTargetGroup, ResourceNames};

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Dashboard {
    /// Writes the pretty printed dashboard json, followed by a newline.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

pub struct DashboardBuilder {
    resource_names: ResourceNames,
    orchestrator: &'static dyn OrchestratorQueries,
    panel_factories: Vec<PanelFactory>,
}

impl DashboardBuilder {
    pub fn new(resource_names: ResourceNames, orchestrator: Orchestrator) -> Self {
        Self {
            resource_names,
            orchestrator: queries_for(orchestrator),
            panel_factories: Vec::new(),
        }
    }

    pub fn add_panel(&mut self, factory: PanelFactory) -> &mut Self {
        self.panel_factories.push(factory);
        self
    }

    /// Utilization and task count of the service, then CPU and memory of every container.
    pub fn add_service_and_task(&mut self) -> &mut Self {
        self.add_panel(row("Service Resource Usage"));
        self.add_panel(Box::new(container::service_utilization));
        self.add_panel(Box::new(container::running_task_count));

        for container_name in self.resource_names.containers.clone() {
            self.add_panel(container::container_cpu(container_name.clone()));
            self.add_panel(container::container_memory(container_name));
        }
        self
    }

    pub fn add_errors_and_warnings(&mut self) -> &mut Self {
        self.add_panel(row("Errors & Warnings"));
        self.add_panel(Box::new(errors::errors));
        self.add_panel(Box::new(errors::warnings));
        self.add_panel(Box::new(logs::logs))
    }

    pub fn add_elb_target_group(&mut self, target_group: &ElbTargetGroup) -> &mut Self {
        self.add_panel(row("Load Balancer"));
        self.add_panel(elb::request_count(target_group.clone()));
        self.add_panel(elb::response_time(target_group.clone()));
        self.add_panel(elb::http_status(target_group.clone()));
        self.add_panel(elb::healthy_hosts(target_group.clone()));
        self.add_panel(elb::request_count_per_target(target_group.clone()))
    }

    /// Does nothing unless the orchestrator routes requests through traefik.
    pub fn add_traefik_service(&mut self) -> &mut Self {
        if !self.orchestrator.has_traefik() {
            return self;
        }

        self.add_panel(row("Traefik"));
        self.add_panel(Box::new(traefik::request_count));
        self.add_panel(Box::new(traefik::response_time));
        self.add_panel(Box::new(traefik::http_status));
        self.add_panel(Box::new(traefik::healthy_endpoints));
        self.add_panel(Box::new(traefik::requests_per_healthy_target))
    }

    pub fn add_api_server_handler(&mut self, method: &str, path: &str) -> &mut Self {
        self.add_panel(row(format!("ApiServer: {method} {path}")));
        self.add_panel(api_server::request_count(path));
        self.add_panel(api_server::response_time(path));
        self.add_panel(api_server::http_status(path))
    }

    pub fn add_http_server_handler(
        &mut self,
        server_name: &str,
        handler: &MetadataHttpServerHandler,
    ) -> &mut Self {
        let route = HttpServerRoute::new(server_name, handler);

        self.add_panel(row(format!(
            "HttpServer {server_name}: {} {}",
            handler.method, handler.path
        )));
        self.add_panel(http_server::request_count(route.clone()));
        self.add_panel(http_server::response_time(route.clone()));
        self.add_panel(http_server::http_status(route))
    }

    pub fn add_dynamodb_table(&mut self, table: &MetadataCloudAwsDynamodbTable) -> &mut Self {
        self.add_panel(row(format!("Dynamodb: {}", table.table_name)));
        self.add_panel(dynamodb::read_usage(table.clone()));
        self.add_panel(dynamodb::read_throttles(table.clone()));
        self.add_panel(dynamodb::write_usage(table.clone()));
        self.add_panel(dynamodb::write_throttles(table.clone()))
    }

    pub fn add_kinesis_kinsumer(
        &mut self,
        kinsumer: &MetadataCloudAwsKinesisKinsumer,
    ) -> &mut Self {
        self.add_panel(row(format!(
            "Kinsumer on Stream: {} ({} Shards)",
            kinsumer.stream_name_full, kinsumer.open_shard_count
        )));
        self.add_panel(kinesis::kinsumer_milliseconds_behind(kinsumer.clone()));
        self.add_panel(kinesis::kinsumer_message_counts(kinsumer.clone()));
        self.add_panel(kinesis::kinsumer_read_operations(kinsumer.clone()));
        self.add_panel(kinesis::kinsumer_process_duration(kinsumer.clone()))
    }

    pub fn add_kinesis_record_writer(
        &mut self,
        writer: &MetadataCloudAwsKinesisRecordWriter,
    ) -> &mut Self {
        self.add_panel(row(format!(
            "Kinesis RecordWriter on Stream: {} ({} Shards)",
            writer.stream_name, writer.open_shard_count
        )));
        self.add_panel(kinesis::record_writer_put_records(writer.clone()));
        self.add_panel(kinesis::record_writer_batch_size(writer.clone()))
    }

    pub fn add_kinesis_stream(&mut self, stream: &dyn KinesisStreamAware) -> &mut Self {
        let stream = KinesisStream::from_aware(stream);

        self.add_panel(row(format!(
            "Kinesis Stream: {} ({} Shards)",
            stream.stream_name_full, stream.open_shard_count
        )));
        self.add_panel(kinesis::stream_success_rate(stream.clone()));
        self.add_panel(kinesis::stream_get_records_bytes(stream.clone()));
        self.add_panel(kinesis::stream_incoming_bytes(stream.clone()));
        self.add_panel(kinesis::stream_incoming_records(stream.clone()));
        self.add_panel(kinesis::stream_record_size(stream))
    }

    pub fn add_sqs_queue(&mut self, queue: &MetadataCloudAwsSqsQueue) -> &mut Self {
        self.add_panel(row(format!("SQS: {}", queue.queue_name_full)));
        self.add_panel(sqs::messages_visible(queue.clone()));
        self.add_panel(sqs::traffic(queue.clone()));
        self.add_panel(sqs::message_size(queue.clone()))
    }

    /// The retry panel is only added for consumers with retries enabled.
    pub fn add_stream_consumer(&mut self, consumer: &MetadataStreamConsumer) -> &mut Self {
        self.add_panel(row(format!("Stream Consumer: {}", consumer.name)));
        self.add_panel(stream_consumer::processed_count(consumer.clone()));
        self.add_panel(stream_consumer::process_duration(consumer.clone()));

        if consumer.retry_enabled {
            self.add_panel(stream_consumer::retry_actions(consumer.clone()));
        }
        self
    }

    pub fn add_stream_producer_daemon(&mut self, producer: &MetadataStreamProducer) -> &mut Self {
        self.add_panel(row(format!("Stream Producer Daemon: {}", producer.name)));
        self.add_panel(stream_producer::daemon_sizes(producer.clone()));
        self.add_panel(stream_producer::message_count(producer.clone()))
    }

    /// Places the panels left to right in insertion order, wrapping to a new line of the grid
    /// once the width is used up. Building again yields the same dashboard.
    pub fn build(&self) -> Dashboard {
        let (mut x, mut y) = (0, 0);
        let mut panels = Vec::with_capacity(self.panel_factories.len());

        for factory in &self.panel_factories {
            let settings = PanelSettings {
                resource_names: &self.resource_names,
                grid_pos: GridPos::at(x, y),
                orchestrator: self.orchestrator,
            };
            let panel = factory(&settings).with_defaults();

            x += panel.grid_pos.w;
            if x >= GRID_WIDTH {
                // The cursor moves down by the width of the panel completing the line.
                x = 0;
                y += panel.grid_pos.w;
            }
            panels.push(panel);
        }

        let title = self.title();
        debug!("Built dashboard {title} with {} panels.", panels.len());

        Dashboard { title, panels }
    }

    fn title(&self) -> String {
        match self.orchestrator.orchestrator() {
            Orchestrator::Ecs => self.resource_names.ecs_task_definition.clone(),
            Orchestrator::Kubernetes => self.resource_names.kubernetes_pod.clone(),
        }
    }
}
