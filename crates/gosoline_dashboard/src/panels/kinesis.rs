//! Kinesis panels: the application's kinsumers and record writers, and the streams themselves.
//!
//! Panels comparing traffic to the stream's limits derive the limit from the open shard count,
//! e.g. `{shards} * 1048576 * PERIOD(m0)` bytes of incoming data per period. The `IF(m0, 1, 1)`
//! factor makes the limit follow the time range of `m0`.

use crate::metadata::{
    KinesisStream,
    MetadataCloudAwsKinesisKinsumer,
    MetadataCloudAwsKinesisRecordWriter,
};
use crate::panel::{Panel, Unit};
use crate::panels::{PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, ExpressionTarget, Statistic};

const KINESIS_NAMESPACE: &str = "AWS/Kinesis";

/// Per shard read limit of kinesis, in bytes per second.
const SHARD_READ_BYTES_PER_SECOND: u64 = 2_097_152;
/// Per shard write limits of kinesis, per second.
const SHARD_WRITE_BYTES_PER_SECOND: u64 = 1_048_576;
const SHARD_WRITE_RECORDS_PER_SECOND: u64 = 1_000;
/// Per shard limit of GetRecords calls, per second.
const SHARD_READ_CALLS_PER_SECOND: u64 = 5;

fn cloudwatch_panel(title: &str, client_name: &str, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        settings.resource_names.datasource_name_for_client(client_name),
        settings.grid_pos,
    )
    .with_min("0")
}

/// A metric the application itself records for a stream.
fn app_stream_target(
    settings: &PanelSettings<'_>,
    stream_name: &str,
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
    .with_dimension("StreamName", stream_name)
}

/// A metric kinesis records for a stream.
fn aws_stream_target(
    stream: &KinesisStream,
    ref_id: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(ref_id, KINESIS_NAMESPACE, metric_name, statistic)
        .with_dimension("StreamName", &stream.stream_name_full)
        .match_exact()
}

pub fn kinsumer_milliseconds_behind(kinsumer: MetadataCloudAwsKinesisKinsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        cloudwatch_panel("MillisecondsBehind", &kinsumer.aws_client_name, settings)
            .with_unit(Unit::Milliseconds)
            .with_targets(vec![app_stream_target(
                settings,
                &kinsumer.stream_name_full,
                "A",
                "MillisecondsBehind",
                Statistic::Maximum,
            )
            .into()])
    })
}

pub fn kinsumer_message_counts(kinsumer: MetadataCloudAwsKinesisKinsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let stream_name = &kinsumer.stream_name_full;

        cloudwatch_panel("Message Counts", &kinsumer.aws_client_name, settings)
            .with_color_overrides(&[
                ("ReadRecords", "semi-dark-blue"),
                ("FailedRecords", "dark-red"),
            ])
            .with_targets(vec![
                app_stream_target(settings, stream_name, "A", "ReadRecords", Statistic::Sum)
                    .with_alias("ReadRecords")
                    .into(),
                app_stream_target(settings, stream_name, "B", "FailedRecords", Statistic::Sum)
                    .with_alias("FailedRecords")
                    .into(),
            ])
    })
}

/// GetRecords calls against the per shard call limit, and the records fetched per call.
pub fn kinsumer_read_operations(kinsumer: MetadataCloudAwsKinesisKinsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let stream_name = &kinsumer.stream_name_full;
        let read_call_limit = format!(
            "{} * {SHARD_READ_CALLS_PER_SECOND} * PERIOD(m1) * IF(m1, 1, 1)",
            kinsumer.open_shard_count
        );

        cloudwatch_panel("Read Operations", &kinsumer.aws_client_name, settings)
            .with_color_overrides(&[("ReadCount Limit", "dark-red")])
            .with_targets(vec![
                app_stream_target(settings, stream_name, "A", "ReadRecords", Statistic::Sum)
                    .with_id("m0")
                    .match_exact()
                    .hidden()
                    .into(),
                app_stream_target(settings, stream_name, "B", "ReadCount", Statistic::Sum)
                    .with_alias("ReadCount")
                    .with_id("m1")
                    .match_exact()
                    .into(),
                ExpressionTarget::new("C", read_call_limit, Statistic::Average)
                    .with_alias("ReadCount Limit")
                    .into(),
                ExpressionTarget::new("D", "IF(m0, IF(m1, m0 / m1, 0), 0)", Statistic::Average)
                    .with_alias("Batch Size")
                    .into(),
            ])
    })
}

pub fn kinsumer_process_duration(kinsumer: MetadataCloudAwsKinesisKinsumer) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let stream_name = &kinsumer.stream_name_full;

        cloudwatch_panel("Process Duration", &kinsumer.aws_client_name, settings)
            .with_unit(Unit::Milliseconds)
            .with_span_nulls()
            .with_targets(vec![
                app_stream_target(settings, stream_name, "A", "ProcessDuration", Statistic::Maximum)
                    .with_alias("Maximum")
                    .with_id("m0")
                    .match_exact()
                    .into(),
                app_stream_target(settings, stream_name, "B", "ProcessDuration", Statistic::Average)
                    .with_alias("Average")
                    .with_id("m1")
                    .match_exact()
                    .into(),
            ])
    })
}

pub fn record_writer_put_records(writer: MetadataCloudAwsKinesisRecordWriter) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let stream_name = &writer.stream_name;

        cloudwatch_panel("Put Records Statistics", &writer.aws_client_name, settings)
            .with_color_overrides(&[
                ("PutRecords", "semi-dark-blue"),
                ("PutRecordsFailure", "dark-red"),
            ])
            .with_targets(vec![
                app_stream_target(settings, stream_name, "A", "PutRecords", Statistic::Sum)
                    .with_alias("PutRecords")
                    .into(),
                app_stream_target(settings, stream_name, "B", "PutRecordsFailure", Statistic::Sum)
                    .with_alias("PutRecordsFailure")
                    .into(),
            ])
    })
}

pub fn record_writer_batch_size(writer: MetadataCloudAwsKinesisRecordWriter) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        let stream_name = &writer.stream_name;
        let records_per_shard =
            format!("m0 / {} /PERIOD(m0) * IF(m0, 1, 1)", writer.open_shard_count);

        let batch_size = app_stream_target(
            settings,
            stream_name,
            "A",
            "PutRecordsBatchSize",
            Statistic::Average,
        );

        cloudwatch_panel("Average Batch Size / Records per shards", &writer.aws_client_name, settings)
            .with_targets(vec![
                batch_size.with_alias("Batch Size").into(),
                app_stream_target(settings, stream_name, "B", "PutRecords", Statistic::Sum)
                    .with_alias("PutRecords")
                    .with_id("m0")
                    .match_exact()
                    .hidden()
                    .into(),
                ExpressionTarget::new("C", records_per_shard, Statistic::Maximum)
                    .with_alias("Records Per Shard")
                    .into(),
            ])
    })
}

/// Success rates of reads and writes, in percent.
pub fn stream_success_rate(stream: KinesisStream) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        cloudwatch_panel("Get / Put Success Rate", &stream.client_name, settings)
            .with_unit(Unit::Percent)
            .with_targets(vec![
                aws_stream_target(&stream, "A", "GetRecords.Success", Statistic::Average)
                    .with_id("m0")
                    .hidden()
                    .into(),
                ExpressionTarget::new("B", "m0 * 100", Statistic::Average)
                    .with_alias("Get records success")
                    .with_id("m1")
                    .into(),
                aws_stream_target(&stream, "C", "PutRecord.Success", Statistic::Average)
                    .with_alias("Put record success")
                    .with_id("m2")
                    .into(),
                aws_stream_target(&stream, "D", "PutRecords.Success", Statistic::Average)
                    .with_id("m3")
                    .hidden()
                    .into(),
                ExpressionTarget::new("E", "m3 * 100", Statistic::Average)
                    .with_alias("Put records success")
                    .with_id("m4")
                    .into(),
            ])
    })
}

/// A summed stream metric next to the limit the open shards allow for it.
fn stream_limit_panel(
    stream: &KinesisStream,
    settings: &PanelSettings<'_>,
    title: &str,
    metric_name: &str,
    alias: &str,
    limit_per_shard: u64,
) -> Panel {
    let limit = format!(
        "{} * {limit_per_shard} * PERIOD(m0) * IF(m0, 1, 1)",
        stream.open_shard_count
    );

    cloudwatch_panel(title, &stream.client_name, settings)
        .with_span_nulls()
        .with_color_overrides(&[("Limit", "dark-red"), (alias, "super-light-blue")])
        .with_targets(vec![
            aws_stream_target(stream, "A", metric_name, Statistic::Sum)
                .with_alias(alias)
                .with_id("m0")
                .into(),
            ExpressionTarget::new("B", limit, Statistic::Maximum).with_alias("Limit").into(),
        ])
}

pub fn stream_get_records_bytes(stream: KinesisStream) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        stream_limit_panel(
            &stream,
            settings,
            "Stream get records - sum (Bytes)",
            "GetRecords.Bytes",
            "GetRecordsBytes",
            SHARD_READ_BYTES_PER_SECOND,
        )
        .with_unit(Unit::DecBytes)
    })
}

pub fn stream_incoming_bytes(stream: KinesisStream) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        stream_limit_panel(
            &stream,
            settings,
            "Stream incoming data - sum (Bytes)",
            "IncomingBytes",
            "IncomingBytes",
            SHARD_WRITE_BYTES_PER_SECOND,
        )
        .with_unit(Unit::DecBytes)
    })
}

pub fn stream_incoming_records(stream: KinesisStream) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        stream_limit_panel(
            &stream,
            settings,
            "Stream incoming data - sum (Count)",
            "IncomingRecords",
            "IncomingRecords",
            SHARD_WRITE_RECORDS_PER_SECOND,
        )
    })
}

pub fn stream_record_size(stream: KinesisStream) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        cloudwatch_panel("Average Record Size (Bytes)", &stream.client_name, settings)
            .with_unit(Unit::DecBytes)
            .with_span_nulls()
            .with_targets(vec![
                aws_stream_target(&stream, "A", "IncomingBytes", Statistic::Sum)
                    .with_alias("IncomingBytes")
                    .with_id("m0")
                    .hidden()
                    .into(),
                aws_stream_target(&stream, "B", "IncomingRecords", Statistic::Sum)
                    .with_alias("IncomingRecords")
                    .with_id("m1")
                    .hidden()
                    .into(),
                ExpressionTarget::new("C", "m0 / m1", Statistic::Maximum).with_alias("Size").into(),
            ])
    })
}
