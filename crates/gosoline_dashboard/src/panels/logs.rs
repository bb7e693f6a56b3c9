use crate::panel::{
    ElasticsearchOptions, GridPos, Panel, PanelOptions, PanelType, GRID_WIDTH, LOGS_PANEL_HEIGHT,
};
use crate::panels::PanelSettings;
use crate::target::ElasticsearchTarget;

/// The latest warnings and errors of the application, full width below the cursor.
pub fn logs(settings: &PanelSettings<'_>) -> Panel {
    let grid_pos = GridPos::new(LOGS_PANEL_HEIGHT, GRID_WIDTH, 0, settings.grid_pos.y);

    Panel::new(
        "Error & Warning Logs",
        PanelType::Logs,
        &settings.resource_names.grafana_elasticsearch_datasource_name,
        grid_pos,
    )
    .with_min("0")
    .with_options(PanelOptions::Elasticsearch(ElasticsearchOptions::default()))
    .with_targets(vec![ElasticsearchTarget::warnings_and_errors().into()])
}
