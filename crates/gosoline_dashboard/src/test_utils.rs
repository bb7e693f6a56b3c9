use std::sync::Mutex;
use std::time::{Duration, Instant};

use assert_json_diff::{assert_json_matches_no_panic, CompareMode, Config};
use async_trait::async_trait;
use serde::Serialize;

use crate::app_id::AppId;
use crate::clock::Clock;
use crate::metadata::{
    ApplicationMetadata,
    MetadataApiServerRoute,
    MetadataCloudAwsDynamodbTable,
    MetadataCloudAwsKinesisKinsumer,
    MetadataCloudAwsKinesisRecordWriter,
    MetadataCloudAwsSqsQueue,
    MetadataHttpServer,
    MetadataHttpServerHandler,
    MetadataStreamConsumer,
    MetadataStreamProducer,
};
use crate::resource_names::{ElbTargetGroup, ResourceNames};

/// Extends the functionality of [`assert_json_diff::assert_json_eq`] by also adding a customizable
/// error message print. Uses [`assert_json_matches_no_panic`].
pub fn assert_json_eq<Lhs, Rhs>(lhs: &Lhs, rhs: &Rhs, message: String)
where
    Lhs: Serialize,
    Rhs: Serialize,
{
    if let Err(error) = assert_json_matches_no_panic(lhs, rhs, Config::new(CompareMode::Strict)) {
        let printed_error = format!("\n\n{message}\n{error}\n\n");
        panic!("{}", printed_error);
    }
}

/// A clock that only moves when told to. Sleeping advances it instantly.
pub struct FakeClock {
    start: Instant,
    offset: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self { start: Instant::now(), offset: Mutex::new(Duration::ZERO), sleeps: Mutex::default() }
    }
}

impl FakeClock {
    pub fn advance(&self, duration: Duration) {
        *self.offset.lock().expect("fake clock lock poisoned") += duration;
    }

    /// Every duration passed to [`Clock::sleep`], in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("fake clock lock poisoned").clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().expect("fake clock lock poisoned")
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("fake clock lock poisoned").push(duration);
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

pub fn test_app_id() -> AppId {
    AppId::new("gosoline", "test", "monitoring", "grp", "dashboard")
}

pub fn ecs_resource_names() -> ResourceNames {
    ResourceNames {
        cloudwatch_namespace: "gosoline/test/monitoring/grp-dashboard".to_owned(),
        containers: vec!["dashboard".to_owned(), "log_router".to_owned()],
        ecs_cluster: "test".to_owned(),
        ecs_service: "grp-dashboard".to_owned(),
        ecs_task_definition: "gosoline-test-monitoring-grp-dashboard".to_owned(),
        environment: "test".to_owned(),
        grafana_cloudwatch_datasource_name: "cloudwatch-monitoring".to_owned(),
        grafana_elasticsearch_datasource_name: "elasticsearch-test-logs".to_owned(),
        target_groups: vec![ElbTargetGroup {
            load_balancer: "app/gosoline-test/0123".to_owned(),
            target_group: "targetgroup/grp-dashboard/4567".to_owned(),
        }],
        ..Default::default()
    }
}

pub fn kubernetes_resource_names() -> ResourceNames {
    ResourceNames {
        cloudwatch_namespace: "gosoline/test/monitoring/grp-dashboard".to_owned(),
        containers: vec!["dashboard".to_owned()],
        environment: "test".to_owned(),
        grafana_cloudwatch_datasource_name: "cloudwatch-monitoring".to_owned(),
        grafana_elasticsearch_datasource_name: "elasticsearch-test-logs".to_owned(),
        kubernetes_namespace: "gosoline".to_owned(),
        kubernetes_pod: "grp-dashboard".to_owned(),
        kubernetes_deployment: "grp-dashboard".to_owned(),
        traefik_service_name: "gosoline-grp-dashboard-8080@kubernetes".to_owned(),
        ..Default::default()
    }
}

/// Metadata touching every kind of resource, deliberately listed out of name order.
pub fn full_metadata() -> ApplicationMetadata {
    let mut metadata = ApplicationMetadata::default();
    metadata.api_server.routes = vec![
        MetadataApiServerRoute { method: "POST".to_owned(), path: "/v1/orders".to_owned() },
        MetadataApiServerRoute { method: "GET".to_owned(), path: "/health".to_owned() },
        MetadataApiServerRoute { method: "GET".to_owned(), path: "/v1/orders".to_owned() },
    ];
    metadata.http_servers = vec![MetadataHttpServer {
        name: "default".to_owned(),
        handlers: vec![MetadataHttpServerHandler {
            method: "GET".to_owned(),
            path: "/metrics".to_owned(),
        }],
    }];
    metadata.stream.consumers = vec![
        MetadataStreamConsumer {
            name: "orders".to_owned(),
            retry_enabled: true,
            retry_type: "sqs".to_owned(),
        },
        MetadataStreamConsumer { name: "audit".to_owned(), ..Default::default() },
    ];
    metadata.stream.producers = vec![
        MetadataStreamProducer { name: "events".to_owned(), daemon_enabled: true },
        MetadataStreamProducer { name: "direct".to_owned(), daemon_enabled: false },
    ];
    metadata.cloud.aws.kinesis.kinsumers = vec![MetadataCloudAwsKinesisKinsumer {
        name: "orders".to_owned(),
        stream_name: "orders".to_owned(),
        stream_name_full: "gosoline-test-monitoring-orders".to_owned(),
        ..Default::default()
    }];
    metadata.cloud.aws.kinesis.record_writers = vec![
        MetadataCloudAwsKinesisRecordWriter {
            stream_name: "gosoline-test-monitoring-orders".to_owned(),
            ..Default::default()
        },
        MetadataCloudAwsKinesisRecordWriter {
            aws_client_name: "analytics".to_owned(),
            stream_name: "gosoline-test-monitoring-clicks".to_owned(),
            open_shard_count: 0,
        },
    ];
    metadata.cloud.aws.sqs.queues = vec![MetadataCloudAwsSqsQueue {
        queue_name: "orders".to_owned(),
        queue_name_full: "gosoline-test-monitoring-grp-orders".to_owned(),
        ..Default::default()
    }];
    metadata.cloud.aws.dynamodb.tables = vec![MetadataCloudAwsDynamodbTable {
        table_name: "gosoline-test-monitoring-grp-orders".to_owned(),
        ..Default::default()
    }];
    metadata
}
