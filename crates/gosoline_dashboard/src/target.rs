//! The queries a panel runs, one variant per metric source family.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use strum_macros::Display;

#[cfg(test)]
#[path = "target_test.rs"]
mod target_test;

const DEFAULT_REGION: &str = "default";

/// CloudWatch aggregation statistics.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Average,
    Maximum,
    Minimum,
    Sum,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelTarget {
    CloudWatch(CloudWatchTarget),
    Expression(ExpressionTarget),
    Prometheus(PrometheusTarget),
    Elasticsearch(ElasticsearchTarget),
}

impl PanelTarget {
    pub fn ref_id(&self) -> &str {
        match self {
            PanelTarget::CloudWatch(target) => &target.ref_id,
            PanelTarget::Expression(target) => &target.ref_id,
            PanelTarget::Prometheus(target) => &target.ref_id,
            PanelTarget::Elasticsearch(target) => &target.ref_id,
        }
    }

    /// The id other targets of the same panel reference this one by, if any.
    pub fn internal_id(&self) -> Option<&str> {
        match self {
            PanelTarget::CloudWatch(target) if !target.id.is_empty() => Some(&target.id),
            PanelTarget::Expression(target) if !target.id.is_empty() => Some(&target.id),
            _ => None,
        }
    }
}

impl From<CloudWatchTarget> for PanelTarget {
    fn from(target: CloudWatchTarget) -> Self {
        PanelTarget::CloudWatch(target)
    }
}

impl From<ExpressionTarget> for PanelTarget {
    fn from(target: ExpressionTarget) -> Self {
        PanelTarget::Expression(target)
    }
}

impl From<PrometheusTarget> for PanelTarget {
    fn from(target: PrometheusTarget) -> Self {
        PanelTarget::Prometheus(target)
    }
}

impl From<ElasticsearchTarget> for PanelTarget {
    fn from(target: ElasticsearchTarget) -> Self {
        PanelTarget::Elasticsearch(target)
    }
}

/// Panics if two targets share a reference id, or if an expression uses an id that no earlier
/// target of the panel defines.
pub fn assert_valid_targets(targets: &[PanelTarget]) {
    let mut ref_ids = BTreeSet::new();
    let mut defined_ids = BTreeSet::new();

    for target in targets {
        assert!(
            ref_ids.insert(target.ref_id()),
            "Reference id '{}' is used by more than one target.",
            target.ref_id()
        );

        if let PanelTarget::Expression(expression) = target {
            for id in expression.referenced_ids() {
                assert!(
                    defined_ids.contains(id),
                    "Expression '{}' references '{id}' before it is defined.",
                    expression.expression
                );
            }
        }

        if let Some(id) = target.internal_id() {
            defined_ids.insert(id);
        }
    }
}

/// A query of a single CloudWatch metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudWatchTarget {
    pub alias: String,
    pub dimensions: BTreeMap<String, String>,
    pub expression: String,
    pub id: String,
    pub hide: bool,
    pub match_exact: bool,
    pub metric_name: String,
    pub namespace: String,
    pub period: String,
    pub ref_id: String,
    pub region: String,
    pub statistics: Vec<Statistic>,
}

impl CloudWatchTarget {
    pub fn new(ref_id: &str, namespace: &str, metric_name: &str, statistic: Statistic) -> Self {
        Self {
            alias: String::new(),
            dimensions: BTreeMap::new(),
            expression: String::new(),
            id: String::new(),
            hide: false,
            match_exact: false,
            metric_name: metric_name.to_owned(),
            namespace: namespace.to_owned(),
            period: String::new(),
            ref_id: ref_id.to_owned(),
            region: DEFAULT_REGION.to_owned(),
            statistics: vec![statistic],
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_owned();
        self
    }

    pub fn with_dimension(mut self, name: &str, value: &str) -> Self {
        self.dimensions.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    pub fn match_exact(mut self) -> Self {
        self.match_exact = true;
        self
    }

    /// Hidden targets only feed expressions; their series are not drawn.
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

/// A CloudWatch metric math expression over the ids of earlier targets.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionTarget {
    pub alias: String,
    pub expression: String,
    pub id: String,
    pub hide: bool,
    pub ref_id: String,
    pub statistics: Vec<Statistic>,
}

impl ExpressionTarget {
    pub fn new(ref_id: &str, expression: impl Into<String>, statistic: Statistic) -> Self {
        Self {
            alias: String::new(),
            expression: expression.into(),
            id: String::new(),
            hide: false,
            ref_id: ref_id.to_owned(),
            statistics: vec![statistic],
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_owned();
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    /// Identifiers in the expression. Metric math functions are upper case, ids are not.
    pub fn referenced_ids(&self) -> Vec<&str> {
        self.expression
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .filter(|token| token.starts_with(|c: char| c.is_ascii_lowercase()))
            .collect()
    }
}

// Grafana expects expression queries in the shape of a regular CloudWatch query.
impl Serialize for ExpressionTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ExpressionTarget", 12)?;
        state.serialize_field("alias", &self.alias)?;
        state.serialize_field("dimensions", &BTreeMap::<String, String>::new())?;
        state.serialize_field("expression", &self.expression)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("hide", &self.hide)?;
        state.serialize_field("matchExact", &true)?;
        state.serialize_field("metricName", "")?;
        state.serialize_field("namespace", "")?;
        state.serialize_field("period", "")?;
        state.serialize_field("refId", &self.ref_id)?;
        state.serialize_field("region", DEFAULT_REGION)?;
        state.serialize_field("statistics", &self.statistics)?;
        state.end()
    }
}

/// A PromQL query.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusTarget {
    pub exemplar: bool,
    pub expr: String,
    pub hide: bool,
    pub interval: String,
    pub legend_format: String,
    pub ref_id: String,
}

impl PrometheusTarget {
    pub fn new(ref_id: &str, expr: impl Into<String>, legend_format: &str) -> Self {
        Self {
            exemplar: true,
            expr: expr.into(),
            hide: false,
            interval: String::new(),
            legend_format: legend_format.to_owned(),
            ref_id: ref_id.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchTarget {
    pub ref_id: String,
    pub query: String,
    pub metrics: Vec<ElasticsearchMetric>,
    pub time_field: String,
}

impl ElasticsearchTarget {
    /// The latest 100 log lines at warning level or above.
    pub fn warnings_and_errors() -> Self {
        Self {
            ref_id: "A".to_owned(),
            query: "level:[3 TO *]".to_owned(),
            metrics: vec![ElasticsearchMetric {
                id: "1".to_owned(),
                metric_type: "logs".to_owned(),
                settings: ElasticsearchMetricSettings { limit: "100".to_owned() },
            }],
            time_field: "@timestamp".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElasticsearchMetric {
    pub id: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub settings: ElasticsearchMetricSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElasticsearchMetricSettings {
    pub limit: String,
}
