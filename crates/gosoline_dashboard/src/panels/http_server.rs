//! Metrics a named http server of the application records per handler.

use crate::metadata::MetadataHttpServerHandler;
use crate::panel::{Panel, Unit};
use crate::panels::{http_status_overview, PanelFactory, PanelSettings};
use crate::target::{CloudWatchTarget, Statistic};

/// The server and handler a panel describes.
#[derive(Clone, Debug)]
pub struct HttpServerRoute {
    pub server_name: String,
    pub handler: MetadataHttpServerHandler,
}

impl HttpServerRoute {
    pub fn new(server_name: &str, handler: &MetadataHttpServerHandler) -> Self {
        Self { server_name: server_name.to_owned(), handler: handler.clone() }
    }

    fn target(
        &self,
        settings: &PanelSettings<'_>,
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
        .with_dimension("Method", &self.handler.method)
        .with_dimension("Path", &self.handler.path)
        .with_dimension("ServerName", &self.server_name)
        .match_exact()
    }
}

fn handler_panel(title: &str, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        &settings.resource_names.grafana_cloudwatch_datasource_name,
        settings.grid_pos,
    )
    .with_min("0")
    .with_color_overrides(&[("Requests", "semi-dark-blue")])
}

pub fn request_count(route: HttpServerRoute) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        handler_panel("Request Count", settings).with_targets(vec![route
            .target(settings, "A", "Requests", "HttpRequestCountPerRoute", Statistic::Sum)
            .into()])
    })
}

pub fn response_time(route: HttpServerRoute) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        handler_panel("Response Time", settings).with_unit(Unit::Milliseconds).with_targets(vec![
            route
                .target(
                    settings,
                    "A",
                    "Response Time",
                    "HttpRequestResponseTimePerRoute",
                    Statistic::Average,
                )
                .into(),
        ])
    })
}

pub fn http_status(route: HttpServerRoute) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        http_status_overview(
            &settings.resource_names.grafana_cloudwatch_datasource_name,
            settings.grid_pos,
            |series| {
                route
                    .target(
                        settings,
                        series.ref_id,
                        series.alias,
                        &format!("HttpStatus{}XXPerRoute", series.class),
                        Statistic::Sum,
                    )
                    .into()
            },
        )
    })
}
