//! Traffic entering the application through the traefik ingress of a kubernetes cluster.

use crate::orchestrator::{kubernetes_pod_filter, traefik_service_filter};
use crate::panel::{Panel, Unit};
use crate::panels::{http_status_overview, PanelSettings, DATASOURCE_PROMETHEUS};
use crate::target::PrometheusTarget;

fn service_filter(settings: &PanelSettings<'_>) -> String {
    traefik_service_filter(&settings.resource_names.traefik_service_name)
}

fn pod_filter(settings: &PanelSettings<'_>) -> String {
    let names = settings.resource_names;
    kubernetes_pod_filter(&names.kubernetes_namespace, &names.kubernetes_pod)
}

pub fn request_count(settings: &PanelSettings<'_>) -> Panel {
    let filter = service_filter(settings);

    Panel::time_series("Request Count", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_min("0")
        .with_color_overrides(&[("Requests", "semi-dark-blue")])
        .with_targets(vec![PrometheusTarget::new(
            "Requests",
            format!("sum(irate(traefik_service_requests_total{{{filter}}}[1m])) * 60"),
            "Requests",
        )
        .into()])
}

/// Mean duration of the requests answered within the rate interval.
pub fn response_time(settings: &PanelSettings<'_>) -> Panel {
    let filter = service_filter(settings);

    Panel::time_series("Response Time", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_unit(Unit::Seconds)
        .with_min("0")
        .with_color_overrides(&[("Response Time", "semi-dark-blue")])
        .with_targets(vec![PrometheusTarget::new(
            "A",
            format!(
                "sum(irate(traefik_service_request_duration_seconds_sum{{{filter}}}[$__rate_interval])) \
                 / sum(irate(traefik_service_requests_total{{{filter}}}[$__rate_interval]))"
            ),
            "Response Time",
        )
        .into()])
}

pub fn http_status(settings: &PanelSettings<'_>) -> Panel {
    let filter = service_filter(settings);

    http_status_overview(DATASOURCE_PROMETHEUS, settings.grid_pos, |series| {
        PrometheusTarget::new(
            series.ref_id,
            format!(
                r#"sum(irate(traefik_service_requests_total{{code=~"{}.*",{filter}}}[1m])) * 60 or vector(0)"#,
                series.class
            ),
            series.alias,
        )
        .into()
    })
}

pub fn healthy_endpoints(settings: &PanelSettings<'_>) -> Panel {
    let filter = pod_filter(settings);

    Panel::time_series("Healthy Endpoints", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_min("0")
        .with_targets(vec![PrometheusTarget::new(
            "A",
            format!(r#"count(kube_pod_status_ready{{condition="true",{filter}}})"#),
            "Healthy Endpoints",
        )
        .into()])
}

pub fn requests_per_healthy_target(settings: &PanelSettings<'_>) -> Panel {
    let service = service_filter(settings);
    let pods = pod_filter(settings);

    Panel::time_series("Requests Per Healthy Target", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_min("0")
        .with_targets(vec![PrometheusTarget::new(
            "A",
            format!(
                r#"sum(irate(traefik_service_requests_total{{{service}}}[1m])) by () * 60/count(kube_pod_status_ready{{condition="true",{pods}}})"#
            ),
            "Requests",
        )
        .into()])
}
