use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use gosoline_config::converters::{
    deserialize_map,
    deserialize_milliseconds_to_duration,
    serialize_duration_as_millis,
    serialize_map,
    serialize_map_as_string,
};
use gosoline_config::dumping::{prepend_sub_config_name, ser_param, SerializeConfig};
use gosoline_config::{ParamPath, ParamPrivacyInput, SerializedParam};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

/// The platform the application is scheduled on. Selects the label schema and the query dialect
/// of the orchestrator sensitive panels.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orchestrator {
    #[default]
    Ecs,
    Kubernetes,
}

impl<'de> Deserialize<'de> for Orchestrator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Orchestrator::from_str(&raw).map_err(|_| {
            let valid: Vec<String> = Orchestrator::iter().map(|o| o.to_string()).collect();
            D::Error::custom(format!(
                "invalid orchestrator '{raw}', expected one of: {}",
                valid.join(", ")
            ))
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[validate(schema(function = "validate_retry_config"))]
pub struct MetadataRetryConfig {
    #[serde(
        rename = "initial_interval_millis",
        serialize_with = "serialize_duration_as_millis",
        deserialize_with = "deserialize_milliseconds_to_duration"
    )]
    pub initial_interval: Duration,
    #[serde(
        rename = "max_interval_millis",
        serialize_with = "serialize_duration_as_millis",
        deserialize_with = "deserialize_milliseconds_to_duration"
    )]
    pub max_interval: Duration,
    #[serde(
        rename = "max_elapsed_time_millis",
        serialize_with = "serialize_duration_as_millis",
        deserialize_with = "deserialize_milliseconds_to_duration"
    )]
    pub max_elapsed_time: Duration,
}

impl Default for MetadataRetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(60),
            max_elapsed_time: Duration::from_secs(5 * 60),
        }
    }
}

fn duration_millis(duration: &Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl SerializeConfig for MetadataRetryConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([
            ser_param(
                "initial_interval_millis",
                &duration_millis(&self.initial_interval),
                "Delay before the first retry of a metadata request that got a 502 response.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "max_interval_millis",
                &duration_millis(&self.max_interval),
                "Upper bound of the delay between two metadata requests.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "max_elapsed_time_millis",
                &duration_millis(&self.max_elapsed_time),
                "Time after which the metadata request is not retried anymore.",
                ParamPrivacyInput::Public,
            ),
        ])
    }
}

fn validate_retry_config(config: &MetadataRetryConfig) -> Result<(), ValidationError> {
    if config.initial_interval.is_zero() {
        let mut error = ValidationError::new("Invalid metadata retry configuration.");
        error.message = Some("initial_interval_millis must be positive.".into());
        return Err(error);
    }
    if config.initial_interval > config.max_interval {
        let mut error = ValidationError::new("Invalid metadata retry configuration.");
        error.message =
            Some("initial_interval_millis must not be greater than max_interval_millis.".into());
        return Err(error);
    }
    Ok(())
}

/// Where and how the application metadata endpoint is reached.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
pub struct MetadataConfig {
    pub domain: String,
    pub use_https: bool,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Replacements applied to the hostname pattern on top of the built in ones.
    #[serde(serialize_with = "serialize_map_as_string", deserialize_with = "deserialize_map")]
    pub extra_replacements: BTreeMap<String, String>,
    #[validate(nested)]
    pub retry: MetadataRetryConfig,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            use_https: true,
            port: 8070,
            extra_replacements: BTreeMap::new(),
            retry: MetadataRetryConfig::default(),
        }
    }
}

impl MetadataConfig {
    pub fn scheme(&self) -> &'static str {
        if self.use_https { "https" } else { "http" }
    }

    /// The replacements the hostname pattern is augmented with, besides the identity tuple.
    pub fn hostname_replacements(&self) -> BTreeMap<String, String> {
        let mut replacements = self.extra_replacements.clone();
        replacements.insert("scheme".to_owned(), self.scheme().to_owned());
        replacements.insert("metadata_domain".to_owned(), self.domain.clone());
        replacements.insert("port".to_owned(), self.port.to_string());
        replacements
    }
}

impl SerializeConfig for MetadataConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        let mut dump = BTreeMap::from_iter([
            ser_param(
                "domain",
                &self.domain,
                "Domain the metadata endpoint of every application is served under.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "use_https",
                &self.use_https,
                "Whether the metadata endpoint is reached through https.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "port",
                &self.port,
                "Port of the metadata endpoint.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "extra_replacements",
                &serialize_map(&self.extra_replacements),
                "Additional hostname pattern replacements, as space separated key:value pairs.",
                ParamPrivacyInput::Public,
            ),
        ]);
        dump.extend(prepend_sub_config_name(self.retry.dump(), "retry"));
        dump
    }
}

/// Patterns every resource name is derived from. Placeholders: `{project}`, `{env}`, `{family}`,
/// `{group}`, `{app}`.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
pub struct ResourceNamePatterns {
    #[validate(length(min = 1))]
    pub hostname: String,
    pub cloudwatch_namespace: String,
    pub ecs_cluster: String,
    pub ecs_service: String,
    pub grafana_cloudwatch_datasource: String,
    pub grafana_elasticsearch_datasource: String,
    pub kubernetes_namespace: String,
    pub kubernetes_pod: String,
    pub kubernetes_deployment: String,
    pub traefik_service_name: String,
}

impl Default for ResourceNamePatterns {
    fn default() -> Self {
        Self {
            hostname: "{scheme}://{group}-{app}.{family}.{env}.{metadata_domain}:{port}".to_owned(),
            cloudwatch_namespace: "{project}/{env}/{family}/{group}-{app}".to_owned(),
            ecs_cluster: "{env}".to_owned(),
            ecs_service: "{group}-{app}".to_owned(),
            grafana_cloudwatch_datasource: "cloudwatch-{family}".to_owned(),
            grafana_elasticsearch_datasource:
                "elasticsearch-{env}-logs-{project}-{family}-{group}-{app}".to_owned(),
            kubernetes_namespace: "{project}".to_owned(),
            kubernetes_pod: "{group}-{app}".to_owned(),
            kubernetes_deployment: "{group}-{app}".to_owned(),
            traefik_service_name: "{project}-{group}-{app}-8080@kubernetes".to_owned(),
        }
    }
}

impl SerializeConfig for ResourceNamePatterns {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        BTreeMap::from_iter([
            ser_param(
                "hostname",
                &self.hostname,
                "Url of the metadata endpoint. Also supports {scheme}, {metadata_domain} and \
                 {port}.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "cloudwatch_namespace",
                &self.cloudwatch_namespace,
                "Cloudwatch namespace the application publishes its metrics to.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "ecs_cluster",
                &self.ecs_cluster,
                "Name of the ecs cluster.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "ecs_service",
                &self.ecs_service,
                "Name of the ecs service.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "grafana_cloudwatch_datasource",
                &self.grafana_cloudwatch_datasource,
                "Name of the default grafana cloudwatch datasource.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "grafana_elasticsearch_datasource",
                &self.grafana_elasticsearch_datasource,
                "Name of the grafana elasticsearch datasource holding the application logs.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "kubernetes_namespace",
                &self.kubernetes_namespace,
                "Kubernetes namespace the application runs in.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "kubernetes_pod",
                &self.kubernetes_pod,
                "Prefix of the application's pod names.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "kubernetes_deployment",
                &self.kubernetes_deployment,
                "Name of the application's kubernetes deployment.",
                ParamPrivacyInput::Public,
            ),
            ser_param(
                "traefik_service_name",
                &self.traefik_service_name,
                "Name of the traefik service routing to the application.",
                ParamPrivacyInput::Public,
            ),
        ])
    }
}

/// The complete configuration of the dashboard provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct DashboardProviderConfig {
    pub orchestrator: Orchestrator,
    #[validate(nested)]
    pub metadata: MetadataConfig,
    #[validate(nested)]
    pub name_patterns: ResourceNamePatterns,
}

impl SerializeConfig for DashboardProviderConfig {
    fn dump(&self) -> BTreeMap<ParamPath, SerializedParam> {
        let mut dump = BTreeMap::from_iter([ser_param(
            "orchestrator",
            &self.orchestrator,
            "The orchestrator the applications run on, one of: ecs, kubernetes.",
            ParamPrivacyInput::Public,
        )]);
        dump.extend(prepend_sub_config_name(self.metadata.dump(), "metadata"));
        dump.extend(prepend_sub_config_name(self.name_patterns.dump(), "name_patterns"));
        dump
    }
}
