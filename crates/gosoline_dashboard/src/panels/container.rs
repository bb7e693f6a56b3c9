//! Resource usage of the application's containers, queried from prometheus through the active
//! orchestrator's label schema.

use crate::orchestrator::ResourceUsageQueries;
use crate::panel::{Panel, ThresholdsStyleMode, Unit};
use crate::panels::{PanelFactory, PanelSettings, DATASOURCE_PROMETHEUS};
use crate::target::{PanelTarget, PrometheusTarget};

const USAGE_COLORS: [(&str, &str); 4] = [
    ("Reserved", "semi-dark-red"),
    ("Minimum", "light-green"),
    ("Average", "light-orange"),
    ("Maximum", "light-red"),
];

fn usage_targets(queries: ResourceUsageQueries, ref_ids: [&str; 4]) -> Vec<PanelTarget> {
    let [reserved, minimum, average, maximum] = ref_ids;
    vec![
        PrometheusTarget::new(reserved, queries.reserved, "Reserved").into(),
        PrometheusTarget::new(minimum, queries.minimum, "Minimum").into(),
        PrometheusTarget::new(average, queries.average, "Average").into(),
        PrometheusTarget::new(maximum, queries.maximum, "Maximum").into(),
    ]
}

pub fn container_cpu(container: impl Into<String>) -> PanelFactory {
    let container = container.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        let queries = settings.orchestrator.container_cpu(settings.resource_names, &container);

        Panel::time_series(
            format!("CPU Utilization ({container})"),
            DATASOURCE_PROMETHEUS,
            settings.grid_pos,
        )
        .with_min("0")
        .with_color_overrides(&USAGE_COLORS)
        .with_targets(usage_targets(queries, ["reservation", "minimum", "average", "maximum"]))
    })
}

pub fn container_memory(container: impl Into<String>) -> PanelFactory {
    let container = container.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        let queries = settings.orchestrator.container_memory(settings.resource_names, &container);

        Panel::time_series(
            format!("Memory Utilization ({container})"),
            DATASOURCE_PROMETHEUS,
            settings.grid_pos,
        )
        .with_unit(Unit::Bytes)
        .with_min("0")
        .with_color_overrides(&USAGE_COLORS)
        .with_targets(usage_targets(queries, ["A", "B", "C", "D"]))
    })
}

/// CPU and memory usage relative to the reservation, one series per container. The axis goes up
/// to 200% so over-use stays visible above the 100% line.
pub fn service_utilization(settings: &PanelSettings<'_>) -> Panel {
    let queries = settings.orchestrator.service_utilization(settings.resource_names);
    let label = settings.orchestrator.container_label();

    Panel::time_series("Service Utilization", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_unit(Unit::Percent)
        .with_min("0")
        .with_max("200")
        .with_thresholds_style(ThresholdsStyleMode::Line)
        .with_absolute_thresholds(vec![("super-light-green", 0), ("semi-dark-red", 100)])
        // Grafana matches the legend with the label part stripped, trailing space included.
        .with_color_overrides(&[("CPU Average ", "light-green")])
        .with_targets(vec![
            PrometheusTarget::new(
                "cpu_average",
                queries.cpu_average,
                &format!("CPU Average {{{{{label}}}}}"),
            )
            .into(),
            PrometheusTarget::new(
                "memory_average",
                queries.memory_average,
                &format!("Memory Average {{{{{label}}}}}"),
            )
            .into(),
        ])
}

pub fn running_task_count(settings: &PanelSettings<'_>) -> Panel {
    let query = settings.orchestrator.running_task_count(settings.resource_names);

    Panel::time_series("Running Task Count", DATASOURCE_PROMETHEUS, settings.grid_pos)
        .with_min("0")
        .with_targets(vec![PrometheusTarget::new("A", query, "RunningTaskCount").into()])
}
