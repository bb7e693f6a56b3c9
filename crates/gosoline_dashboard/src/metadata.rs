//! The description an application publishes about its own runtime footprint.
//!
//! Every key is optional when decoding, so `{}` is the metadata of an application without any
//! routes, streams, queues or tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app_id::AppId;
use crate::resource_names::DEFAULT_CLIENT_NAME;

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_owned()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationMetadata {
    #[serde(rename = "apiserver")]
    pub api_server: MetadataApiServer,
    pub cloud: MetadataCloud,
    pub stream: MetadataStream,
    #[serde(rename = "httpservers")]
    pub http_servers: Vec<MetadataHttpServer>,
}

impl ApplicationMetadata {
    /// Copies the discovered open shard count of every kinesis stream onto its readers and
    /// writers. Streams without a discovered count keep 0.
    pub fn fill_open_shard_counts(&mut self, stream_shard_counts: &BTreeMap<String, u32>) {
        let kinesis = &mut self.cloud.aws.kinesis;
        for kinsumer in &mut kinesis.kinsumers {
            kinsumer.open_shard_count =
                stream_shard_counts.get(&kinsumer.stream_name_full).copied().unwrap_or_default();
        }
        for writer in &mut kinesis.record_writers {
            writer.open_shard_count =
                stream_shard_counts.get(&writer.stream_name).copied().unwrap_or_default();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataApiServer {
    pub routes: Vec<MetadataApiServerRoute>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataApiServerRoute {
    pub method: String,
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataHttpServer {
    pub name: String,
    pub handlers: Vec<MetadataHttpServerHandler>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataHttpServerHandler {
    pub method: String,
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloud {
    pub aws: MetadataCloudAws,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAws {
    pub dynamodb: MetadataCloudAwsDynamodb,
    pub kinesis: MetadataCloudAwsKinesis,
    pub sqs: MetadataCloudAwsSqs,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsDynamodb {
    pub tables: Vec<MetadataCloudAwsDynamodbTable>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsDynamodbTable {
    pub aws_client_name: String,
    pub table_name: String,
}

impl Default for MetadataCloudAwsDynamodbTable {
    fn default() -> Self {
        Self { aws_client_name: default_client_name(), table_name: String::new() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsKinesis {
    pub kinsumers: Vec<MetadataCloudAwsKinesisKinsumer>,
    pub record_writers: Vec<MetadataCloudAwsKinesisRecordWriter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsKinesisKinsumer {
    pub aws_client_name: String,
    pub client_id: String,
    pub name: String,
    pub stream_app_id: AppId,
    pub stream_name: String,
    pub stream_name_full: String,
    pub open_shard_count: u32,
}

impl Default for MetadataCloudAwsKinesisKinsumer {
    fn default() -> Self {
        Self {
            aws_client_name: default_client_name(),
            client_id: String::new(),
            name: String::new(),
            stream_app_id: AppId::default(),
            stream_name: String::new(),
            stream_name_full: String::new(),
            open_shard_count: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsKinesisRecordWriter {
    pub aws_client_name: String,
    pub stream_name: String,
    pub open_shard_count: u32,
}

impl Default for MetadataCloudAwsKinesisRecordWriter {
    fn default() -> Self {
        Self {
            aws_client_name: default_client_name(),
            stream_name: String::new(),
            open_shard_count: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsSqs {
    pub queues: Vec<MetadataCloudAwsSqsQueue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataCloudAwsSqsQueue {
    pub aws_client_name: String,
    pub queue_name: String,
    pub queue_name_full: String,
}

impl Default for MetadataCloudAwsSqsQueue {
    fn default() -> Self {
        Self {
            aws_client_name: default_client_name(),
            queue_name: String::new(),
            queue_name_full: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataStream {
    pub consumers: Vec<MetadataStreamConsumer>,
    pub producers: Vec<MetadataStreamProducer>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataStreamConsumer {
    pub name: String,
    pub retry_enabled: bool,
    pub retry_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataStreamProducer {
    pub name: String,
    pub daemon_enabled: bool,
}

/// The view of a kinesis stream the stream panels need. Both readers and writers of a stream
/// provide it.
pub trait KinesisStreamAware {
    fn client_name(&self) -> &str;
    fn stream_name_full(&self) -> &str;
    fn open_shard_count(&self) -> u32;
}

impl KinesisStreamAware for MetadataCloudAwsKinesisKinsumer {
    fn client_name(&self) -> &str {
        &self.aws_client_name
    }

    fn stream_name_full(&self) -> &str {
        &self.stream_name_full
    }

    fn open_shard_count(&self) -> u32 {
        self.open_shard_count
    }
}

impl KinesisStreamAware for MetadataCloudAwsKinesisRecordWriter {
    fn client_name(&self) -> &str {
        &self.aws_client_name
    }

    fn stream_name_full(&self) -> &str {
        &self.stream_name
    }

    fn open_shard_count(&self) -> u32 {
        self.open_shard_count
    }
}

/// An owned kinesis stream, detached from whichever reader or writer it was found through.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct KinesisStream {
    pub stream_name_full: String,
    pub client_name: String,
    pub open_shard_count: u32,
}

impl KinesisStream {
    pub fn from_aware(stream: &dyn KinesisStreamAware) -> Self {
        Self {
            stream_name_full: stream.stream_name_full().to_owned(),
            client_name: stream.client_name().to_owned(),
            open_shard_count: stream.open_shard_count(),
        }
    }
}

impl KinesisStreamAware for KinesisStream {
    fn client_name(&self) -> &str {
        &self.client_name
    }

    fn stream_name_full(&self) -> &str {
        &self.stream_name_full
    }

    fn open_shard_count(&self) -> u32 {
        self.open_shard_count
    }
}
