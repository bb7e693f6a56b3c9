//! Application load balancer metrics of one target group.

use crate::panel::{Panel, Unit};
use crate::panels::{http_status_overview, PanelFactory, PanelSettings};
use crate::resource_names::ElbTargetGroup;
use crate::target::{CloudWatchTarget, Statistic};

const ELB_NAMESPACE: &str = "AWS/ApplicationELB";

fn elb_target(
    target_group: &ElbTargetGroup,
    ref_id: &str,
    alias: &str,
    metric_name: &str,
    statistic: Statistic,
) -> CloudWatchTarget {
    CloudWatchTarget::new(ref_id, ELB_NAMESPACE, metric_name, statistic)
        .with_alias(alias)
        .with_dimension("TargetGroup", &target_group.target_group)
        .with_dimension("LoadBalancer", &target_group.load_balancer)
        .match_exact()
}

fn elb_panel(title: &str, settings: &PanelSettings<'_>) -> Panel {
    Panel::time_series(
        title,
        &settings.resource_names.grafana_cloudwatch_datasource_name,
        settings.grid_pos,
    )
    .with_min("0")
}

pub fn request_count(target_group: ElbTargetGroup) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        elb_panel("Request Count", settings)
            .with_color_overrides(&[("Requests", "semi-dark-blue")])
            .with_targets(vec![elb_target(
                &target_group,
                "A",
                "Requests",
                "RequestCount",
                Statistic::Sum,
            )
            .into()])
    })
}

pub fn response_time(target_group: ElbTargetGroup) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        elb_panel("Response Time", settings)
            .with_unit(Unit::Seconds)
            .with_color_overrides(&[("Requests", "semi-dark-blue")])
            .with_targets(vec![elb_target(
                &target_group,
                "A",
                "Response Time",
                "TargetResponseTime",
                Statistic::Average,
            )
            .into()])
    })
}

pub fn http_status(target_group: ElbTargetGroup) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        http_status_overview(
            &settings.resource_names.grafana_cloudwatch_datasource_name,
            settings.grid_pos,
            |series| {
                elb_target(
                    &target_group,
                    series.ref_id,
                    series.alias,
                    &format!("HTTPCode_Target_{}XX_Count", series.class),
                    Statistic::Sum,
                )
                .into()
            },
        )
    })
}

pub fn healthy_hosts(target_group: ElbTargetGroup) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        elb_panel("Healthy Hosts", settings).with_targets(vec![elb_target(
            &target_group,
            "A",
            "Hosts",
            "HealthyHostCount",
            Statistic::Average,
        )
        .into()])
    })
}

pub fn request_count_per_target(target_group: ElbTargetGroup) -> PanelFactory {
    Box::new(move |settings: &PanelSettings<'_>| {
        elb_panel("Request Counts Per Target", settings).with_targets(vec![elb_target(
            &target_group,
            "A",
            "Requests",
            "RequestCountPerTarget",
            Statistic::Sum,
        )
        .into()])
    })
}
