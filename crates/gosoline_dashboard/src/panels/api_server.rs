//! Metrics the api server of the application records per route path.

use crate::panel::{Panel, Unit};
use crate::panels::{http_status_overview, PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, Statistic};

fn route_target(
    settings: &PanelSettings<'_>,
    path: &str,
    ref_id: &str,
    alias: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(
        ref_id,
        &settings.resource_names.cloudwatch_namespace,
        metric_name,
        statistic,
    )
    .with_alias(alias)
    .with_dimension("path", path)
    .match_exact()
}

fn route_panel(title: &str, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        &settings.resource_names.grafana_cloudwatch_datasource_name,
        settings.grid_pos,
    )
    .with_min("0")
    .with_color_overrides(&[("Requests", "semi-dark-blue")])
}

pub fn request_count(path: impl Into<String>) -> PanelFactory {
    let path = path.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        route_panel("Request Count", settings).with_targets(vec![route_target(
            settings,
            &path,
            "A",
            "Requests",
            "ApiRequestCount",
            Statistic::Sum,
        )
        .into()])
    })
}

pub fn response_time(path: impl Into<String>) -> PanelFactory {
    let path = path.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        route_panel("Response Time", settings).with_unit(Unit::Milliseconds).with_targets(vec![
            route_target(
                settings,
                &path,
                "A",
                "Response Time",
                "ApiRequestResponseTime",
                Statistic::Average,
            )
            .into(),
        ])
    })
}

pub fn http_status(path: impl Into<String>) -> PanelFactory {
    let path = path.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        http_status_overview(
            &settings.resource_names.grafana_cloudwatch_datasource_name,
            settings.grid_pos,
            |series| {
                route_target(
                    settings,
                    &path,
                    series.ref_id,
                    series.alias,
                    &format!("ApiStatus{}XX", series.class),
                    Statistic::Sum,
                )
                .into()
            },
        )
    })
}
