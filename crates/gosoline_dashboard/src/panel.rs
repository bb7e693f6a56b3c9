//! The grafana panel document and the builder methods panel factories assemble it with.

use serde::{Serialize, Serializer};
use strum_macros::Display;

use crate::target::{assert_valid_targets, PanelTarget};

#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;

/// Number of grid columns of a dashboard.
pub const GRID_WIDTH: u32 = 24;
pub const DEFAULT_PANEL_WIDTH: u32 = 12;
pub const DEFAULT_PANEL_HEIGHT: u32 = 8;
pub const DEFAULT_LINE_WIDTH: u32 = 2;
pub const LOGS_PANEL_HEIGHT: u32 = 16;

/// Grafana panel types.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PanelType {
    TimeSeries,
    Row,
    Logs,
}

/// Grafana value units.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "bytes")]
    #[strum(serialize = "bytes")]
    Bytes,
    #[serde(rename = "decbytes")]
    #[strum(serialize = "decbytes")]
    DecBytes,
    #[serde(rename = "ms")]
    #[strum(serialize = "ms")]
    Milliseconds,
    #[serde(rename = "percent")]
    #[strum(serialize = "percent")]
    Percent,
    #[serde(rename = "s")]
    #[strum(serialize = "s")]
    Seconds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPlacement {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    Multi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    Absolute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdsStyleMode {
    Line,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GridPos {
    pub h: u32,
    pub w: u32,
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub const fn new(h: u32, w: u32, x: u32, y: u32) -> Self {
        Self { h, w, x, y }
    }

    /// A default sized panel at the given cursor position.
    pub const fn at(x: u32, y: u32) -> Self {
        Self::new(DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, x, y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    #[serde(skip_serializing_if = "is_false")]
    pub collapsed: bool,
    pub datasource: String,
    pub field_config: FieldConfig,
    pub grid_pos: GridPos,
    pub options: Option<PanelOptions>,
    pub targets: Vec<PanelTarget>,
    pub title: String,
    #[serde(rename = "type")]
    pub panel_type: PanelType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<Panel>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        panel_type: PanelType,
        datasource: impl Into<String>,
        grid_pos: GridPos,
    ) -> Self {
        Self {
            collapsed: false,
            datasource: datasource.into(),
            field_config: FieldConfig::default(),
            grid_pos,
            options: None,
            targets: Vec::new(),
            title: title.into(),
            panel_type,
            panels: Vec::new(),
        }
    }

    /// A time series panel with CloudWatch style options, whose tooltip mode is filled in when the
    /// dashboard is built.
    pub fn time_series(
        title: impl Into<String>,
        datasource: impl Into<String>,
        grid_pos: GridPos,
    ) -> Self {
        Self::new(title, PanelType::TimeSeries, datasource, grid_pos)
            .with_options(PanelOptions::CloudWatch(CloudWatchOptions::default()))
    }

    /// A full width row header at height `y`.
    pub fn row(title: impl Into<String>, y: u32) -> Self {
        Self::new(title, PanelType::Row, "", GridPos::new(1, GRID_WIDTH, 0, y))
    }

    /// A row holding `panels`, folded away until expanded.
    pub fn collapsed_row(title: impl Into<String>, y: u32, panels: Vec<Panel>) -> Self {
        Self { collapsed: true, panels, ..Self::row(title, y) }
    }

    pub fn with_options(mut self, options: PanelOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the queries of the panel.
    ///
    /// # Panics
    ///
    /// If two targets share a reference id or an expression references an id not defined by an
    /// earlier target.
    pub fn with_targets(mut self, targets: Vec<PanelTarget>) -> Self {
        assert_valid_targets(&targets);
        self.targets = targets;
        self
    }

    pub fn with_color_overrides(mut self, overrides: &[(&str, &str)]) -> Self {
        self.field_config
            .overrides
            .extend(overrides.iter().map(|(alias, color)| color_override(alias, color)));
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.field_config.defaults.unit = Some(unit);
        self
    }

    pub fn with_min(mut self, min: &str) -> Self {
        self.field_config.defaults.min = Some(min.to_owned());
        self
    }

    pub fn with_max(mut self, max: &str) -> Self {
        self.field_config.defaults.max = Some(max.to_owned());
        self
    }

    pub fn with_absolute_thresholds(mut self, steps: Vec<(&str, i64)>) -> Self {
        self.field_config.defaults.thresholds = Some(Thresholds {
            mode: ThresholdMode::Absolute,
            steps: steps
                .into_iter()
                .map(|(color, value)| ThresholdStep { color: color.to_owned(), value })
                .collect(),
        });
        self
    }

    pub fn with_thresholds_style(mut self, mode: ThresholdsStyleMode) -> Self {
        self.field_config.defaults.custom.thresholds_style = Some(ThresholdsStyle { mode });
        self
    }

    /// Connects the line across missing data points.
    pub fn with_span_nulls(mut self) -> Self {
        self.field_config.defaults.custom.span_nulls = true;
        self
    }

    pub fn with_axis_placement(mut self, axis_placement: AxisPlacement) -> Self {
        self.field_config.defaults.custom.axis_placement = Some(axis_placement);
        self
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.field_config.defaults.custom.line_width = Some(line_width);
        self
    }

    /// Fills the styling every panel of a dashboard shares, keeping values a factory set itself.
    pub fn with_defaults(mut self) -> Self {
        let custom = &mut self.field_config.defaults.custom;
        custom.axis_placement.get_or_insert(AxisPlacement::Right);
        custom.line_width.get_or_insert(DEFAULT_LINE_WIDTH);

        if let Some(PanelOptions::CloudWatch(options)) = &mut self.options {
            options.tooltip.mode.get_or_insert(TooltipMode::Multi);
        }
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldConfig {
    pub defaults: FieldConfigDefaults,
    pub overrides: Vec<Override>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldConfigDefaults {
    pub custom: FieldConfigCustom,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfigCustom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_placement: Option<AxisPlacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds_style: Option<ThresholdsStyle>,
    pub span_nulls: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThresholdsStyle {
    pub mode: ThresholdsStyleMode,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Thresholds {
    pub mode: ThresholdMode,
    pub steps: Vec<ThresholdStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThresholdStep {
    pub color: String,
    pub value: i64,
}

/// Field properties applied to the series matched by `matcher`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Override {
    pub matcher: OverrideMatcher,
    pub properties: Vec<OverrideProperty>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverrideMatcher {
    pub id: String,
    pub options: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverrideProperty {
    pub id: String,
    pub value: OverridePropertyValue,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridePropertyValue {
    pub fixed_color: String,
    pub mode: String,
}

/// Draws the series named exactly `alias` in `color`.
pub fn color_override(alias: &str, color: &str) -> Override {
    Override {
        matcher: OverrideMatcher { id: "byName".to_owned(), options: alias.to_owned() },
        properties: vec![OverrideProperty {
            id: "color".to_owned(),
            value: OverridePropertyValue {
                fixed_color: color.to_owned(),
                mode: "fixed".to_owned(),
            },
        }],
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelOptions {
    CloudWatch(CloudWatchOptions),
    Elasticsearch(ElasticsearchOptions),
}

// Grafana reads options without a discriminator.
impl Serialize for PanelOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PanelOptions::CloudWatch(options) => options.serialize(serializer),
            PanelOptions::Elasticsearch(options) => options.serialize(serializer),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CloudWatchOptions {
    pub tooltip: Tooltip,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TooltipMode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchOptions {
    pub show_time: bool,
    pub show_labels: bool,
    pub show_common_labels: bool,
    pub wrap_log_message: bool,
    pub prettify_log_message: bool,
    pub enable_log_details: bool,
    pub dedup_strategy: String,
    pub sort_order: String,
}

impl Default for ElasticsearchOptions {
    fn default() -> Self {
        Self {
            show_time: true,
            show_labels: false,
            show_common_labels: false,
            wrap_log_message: false,
            prettify_log_message: false,
            enable_log_details: true,
            dedup_strategy: "none".to_owned(),
            sort_order: "Descending".to_owned(),
        }
    }
}
