//! Builds grafana dashboard definitions for gosoline applications.
//!
//! The [`dashboard::DashboardBuilder`] collects panel factories in order and lays them out on a 24
//! column grid. Which panels get added is driven by the [`metadata::ApplicationMetadata`] an
//! application exposes, fetched with the [`metadata_reader::MetadataReader`]. Queries that depend
//! on the scheduling platform go through an [`orchestrator::OrchestratorQueries`] strategy.

pub mod app_id;
pub mod augment;
pub mod clock;
pub mod dashboard;
pub mod dashboard_definition;
pub mod errors;
pub mod metadata;
pub mod metadata_reader;
pub mod orchestrator;
pub mod panel;
pub mod panels;
pub mod resource_names;
pub mod target;
#[cfg(any(feature = "testing", test))]
pub mod test_utils;
pub mod trace_util;
