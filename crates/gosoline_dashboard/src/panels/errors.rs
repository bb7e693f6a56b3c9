//! Counters of the log lines the application wrote at error and warning level.

use crate::panel::{AxisPlacement, Panel, DEFAULT_LINE_WIDTH};
use crate::panels::PanelSettings;
use crate::target::{CloudWatchTarget, Statistic};

fn log_level_count(settings: &PanelSettings<'_>, alias: &str, metric: &str, color: &str) -> Panel {
    let names = settings.resource_names;

    Panel::time_series(alias, &names.grafana_cloudwatch_datasource_name, settings.grid_pos)
        .with_axis_placement(AxisPlacement::Right)
        .with_line_width(DEFAULT_LINE_WIDTH)
        .with_color_overrides(&[(alias, color)])
        .with_targets(vec![CloudWatchTarget::new(
            "A",
            &names.cloudwatch_namespace,
            metric,
            Statistic::Sum,
        )
        .with_alias(alias)
        .into()])
}

pub fn errors(settings: &PanelSettings<'_>) -> Panel {
    log_level_count(settings, "Errors", "error", "dark-red")
}

pub fn warnings(settings: &PanelSettings<'_>) -> Panel {
    log_level_count(settings, "Warnings", "warn", "dark-yellow")
}
