//! Panel factories, one module per family of resources.
//!
//! A factory is created with the resource it describes and invoked by the
//! [`crate::dashboard::DashboardBuilder`] once the grid position of its panel is known. Factories
//! are pure: the same settings always yield the same panel.

use crate::orchestrator::OrchestratorQueries;
use crate::panel::{GridPos, Panel};
use crate::resource_names::ResourceNames;
use crate::target::PanelTarget;

pub mod api_server;
pub mod container;
pub mod dynamodb;
pub mod elb;
pub mod errors;
pub mod http_server;
pub mod kinesis;
pub mod logs;
pub mod row;
pub mod sqs;
pub mod stream_consumer;
pub mod stream_producer;
pub mod traefik;

#[cfg(test)]
#[path = "panels_test.rs"]
mod panels_test;

pub const DATASOURCE_PROMETHEUS: &str = "prometheus";

/// What a factory gets to know about the dashboard it is placed on.
pub struct PanelSettings<'a> {
    pub resource_names: &'a ResourceNames,
    pub grid_pos: GridPos,
    pub orchestrator: &'a dyn OrchestratorQueries,
}

pub type PanelFactory = Box<dyn Fn(&PanelSettings<'_>) -> Panel + Send + Sync>;

/// One series of an HTTP status overview.
pub struct HttpStatusSeries {
    /// Leading digit of the status codes in the class.
    pub class: char,
    pub ref_id: &'static str,
    pub alias: &'static str,
    pub color: &'static str,
}

pub const HTTP_STATUS_SERIES: [HttpStatusSeries; 4] = [
    HttpStatusSeries { class: '2', ref_id: "A", alias: "HTTP 2XX", color: "semi-dark-green" },
    HttpStatusSeries { class: '3', ref_id: "B", alias: "HTTP 3XX", color: "semi-dark-yellow" },
    HttpStatusSeries { class: '4', ref_id: "C", alias: "HTTP 4XX", color: "semi-dark-orange" },
    HttpStatusSeries { class: '5', ref_id: "D", alias: "HTTP 5XX", color: "dark-red" },
];

/// The "HTTP Status Overview" panel with one target per status class, as produced by `target`.
pub fn http_status_overview(
    datasource: &str,
    grid_pos: GridPos,
    target: impl Fn(&HttpStatusSeries) -> PanelTarget,
) -> Panel {
    let overrides: Vec<(&str, &str)> =
        HTTP_STATUS_SERIES.iter().map(|series| (series.alias, series.color)).collect();

    Panel::time_series("HTTP Status Overview", datasource, grid_pos)
        .with_min("0")
        .with_color_overrides(&overrides)
        .with_targets(HTTP_STATUS_SERIES.iter().map(target).collect())
}
