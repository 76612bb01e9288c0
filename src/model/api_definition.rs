//! API definition payloads as the gateway and dashboard understand them.
//!
//! Field names follow the backend's JSON format. Optional fields that the
//! backend treats as "unset" are `Option`s skipped when empty so a definition
//! written as a custom resource round-trips without picking up defaults.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::numeric::Percent;
use super::target::{RewriteToInternal, TargetInternal};

pub type HttpMethod = String;

/// Key in `config_data` holding the custom resource name of an exported API.
pub const CONFIG_DATA_NAME_KEY: &str = "k8sName";
/// Key in `config_data` holding the custom resource namespace of an exported API.
pub const CONFIG_DATA_NAMESPACE_KEY: &str = "k8sNamespace";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointMethodMeta {
    pub action: String,
    pub code: i32,
    pub data: String,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndPointMeta {
    pub path: String,
    pub ignore_case: bool,
    pub method_actions: HashMap<String, EndpointMethodMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheMeta {
    pub method: HttpMethod,
    pub path: String,
    pub cache_key_regex: String,
    #[serde(rename = "cache_response_codes")]
    pub cache_only_response_codes: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateData {
    pub input_type: String,
    pub template_mode: String,
    pub enable_session: bool,
    pub template_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMeta {
    pub template_data: TemplateData,
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformJqMeta {
    pub filter: String,
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderInjectionMeta {
    pub delete_headers: Vec<String>,
    pub add_headers: HashMap<String, String>,
    pub path: String,
    pub method: HttpMethod,
    #[serde(rename = "act_on")]
    pub act_on_response: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardTimeoutMeta {
    pub path: String,
    pub method: HttpMethod,
    pub timeout: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackEndpointMeta {
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalMeta {
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSizeMeta {
    pub path: String,
    pub method: HttpMethod,
    pub size_limit: i64,
}

/// Trips after `threshold_percent` of `samples` requests fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerMeta {
    pub path: String,
    pub method: HttpMethod,
    pub threshold_percent: Percent,
    pub samples: i64,
    /// Seconds before the upstream is retried
    pub return_to_service_after: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_half_open_state: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringRegexMap {
    #[serde(rename = "match_rx")]
    pub match_pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingTriggerOptions {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub header_matches: HashMap<String, StringRegexMap>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub query_val_matches: HashMap<String, StringRegexMap>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub path_part_matches: HashMap<String, StringRegexMap>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub session_meta_matches: HashMap<String, StringRegexMap>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub request_context_matches: HashMap<String, StringRegexMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_matches: Option<StringRegexMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingTrigger {
    /// `any` or `all`
    pub on: String,
    pub options: RoutingTriggerOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_to_internal: Option<RewriteToInternal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlRewriteMeta {
    /// Endpoint listen path
    pub path: String,
    pub method: HttpMethod,
    pub match_pattern: String,
    /// Upstream path or URL to rewrite to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_to: Option<String>,
    /// Takes precedence over `rewrite_to` when both are set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_to_internal: Option<RewriteToInternal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<RoutingTrigger>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualMeta {
    pub response_function_name: String,
    pub function_source_type: String,
    pub function_source_uri: String,
    pub path: String,
    pub method: HttpMethod,
    pub use_session: bool,
    pub proxy_on_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodTransformMeta {
    pub path: String,
    pub method: HttpMethod,
    pub to_method: HttpMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatePathMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Replaces the default 422 for validation failures
    pub error_response_code: i32,
    pub path: String,
    pub method: HttpMethod,
    pub schema: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedPathsSet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<EndPointMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub white_list: Vec<EndPointMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub black_list: Vec<EndPointMeta>,
    #[serde(rename = "cache", skip_serializing_if = "Vec::is_empty")]
    pub cached: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<TemplateMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform_response: Vec<TemplateMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform_jq: Vec<TransformJqMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform_jq_response: Vec<TransformJqMeta>,
    #[serde(rename = "transform_headers", skip_serializing_if = "Vec::is_empty")]
    pub transform_header: Vec<HeaderInjectionMeta>,
    #[serde(rename = "transform_response_headers", skip_serializing_if = "Vec::is_empty")]
    pub transform_response_header: Vec<HeaderInjectionMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advance_cache_config: Vec<CacheMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hard_timeouts: Vec<HardTimeoutMeta>,
    #[serde(rename = "circuit_breakers", skip_serializing_if = "Vec::is_empty")]
    pub circuit_breaker: Vec<CircuitBreakerMeta>,
    #[serde(rename = "url_rewrites", skip_serializing_if = "Vec::is_empty")]
    pub url_rewrite: Vec<UrlRewriteMeta>,
    #[serde(rename = "virtual", skip_serializing_if = "Vec::is_empty")]
    pub virtual_: Vec<VirtualMeta>,
    #[serde(rename = "size_limits", skip_serializing_if = "Vec::is_empty")]
    pub size_limit: Vec<RequestSizeMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method_transforms: Vec<MethodTransformMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub track_endpoints: Vec<TrackEndpointMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub do_not_track_endpoints: Vec<TrackEndpointMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validate_json: Vec<ValidatePathMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub internal: Vec<InternalMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfoPaths {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub white_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub black_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<VersionInfoPaths>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_extended_paths: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_paths: Option<ExtendedPathsSet>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub global_headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_headers_remove: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub global_response_headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_response_headers_remove: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_endpoint_case: Option<bool>,
    #[serde(skip_serializing_if = "is_zero")]
    pub global_size_limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_target: Option<String>,
}

/// Versions are keyed by name and kept sorted, so every walk over them visits
/// versions in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionData {
    pub not_versioned: bool,
    pub default_version: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub versions: BTreeMap<String, VersionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionDefinition {
    pub location: String,
    pub key: String,
    pub strip_path: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareDefinition {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_body_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdExtractorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    #[serde(rename = "param_name", skip_serializing_if = "Option::is_none")]
    pub form_param_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_expression: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub regex_match_index: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareIdExtractor {
    pub extract_from: String,
    pub extract_with: String,
    pub extractor_config: IdExtractorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareSection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pre: Vec<MiddlewareDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<MiddlewareDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_key_auth: Vec<MiddlewareDefinition>,
    pub auth_check: MiddlewareDefinition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response: Vec<MiddlewareDefinition>,
    pub driver: String,
    pub id_extractor: MiddlewareIdExtractor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_cache: Option<bool>,
    /// TTL of a cached object in seconds
    pub cache_timeout: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_all_safe_requests: Option<bool>,
    #[serde(rename = "cache_response_codes", skip_serializing_if = "Vec::is_empty")]
    pub cache_only_response_codes: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_upstream_cache_control: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control_ttl_header: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cache_by_headers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseProcessor {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDiscoveryConfiguration {
    pub use_discovery_service: bool,
    pub query_endpoint: String,
    pub use_nested_query: bool,
    pub parent_data_path: String,
    pub data_path: String,
    pub port_data_path: String,
    pub target_path: String,
    pub use_target_list: bool,
    pub cache_timeout: i64,
    pub endpoint_returns_list: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyTransport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_insecure_skip_verify: Option<bool>,
    #[serde(rename = "ssl_ciphers", skip_serializing_if = "Vec::is_empty")]
    pub ssl_cipher_suites: Vec<String>,
    /// 769 (TLS 1.0) to 772 (TLS 1.3)
    #[serde(skip_serializing_if = "is_zero_u16")]
    pub ssl_min_version: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_force_common_name_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// Where and how requests are proxied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_host_header: Option<bool>,
    /// Path the gateway listens on, e.g. `/httpbin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_path: Option<String>,
    pub target_url: String,
    /// In-cluster API to proxy to, resolved into `target_url` before sending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_internal: Option<TargetInternal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_strip_slash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_listen_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_load_balancing: Option<bool>,
    #[serde(rename = "target_list", skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_host_against_uptime_tests: Option<bool>,
    pub transport: ProxyTransport,
    pub service_discovery: ServiceDiscoveryConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_methods: Vec<HttpMethod>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_headers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exposed_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_age: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_passthrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Meta {
    pub allowed_access_types: Vec<String>,
    pub allowed_authorize_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_login_redirect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    pub algorithm: String,
    pub header: String,
    pub secret: String,
    pub allowed_clock_skew: i64,
    pub error_code: i32,
    pub error_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_param: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cookie: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
    pub auth_header_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_certificate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_signature: Option<bool>,
    pub signature: SignatureConfig,
}

/// Requests allowed per `per` seconds across all consumers of the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalRateLimit {
    pub rate: i64,
    pub per: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlPlayground {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlFieldConfig {
    pub type_name: String,
    pub field_name: String,
    pub disable_default_mapping: bool,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlTypeFields {
    #[serde(rename = "type")]
    pub type_: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlEngineDataSource {
    /// `REST`, `GraphQL` or `Kafka`
    pub kind: String,
    pub name: String,
    pub internal: bool,
    pub root_fields: Vec<GraphQlTypeFields>,
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlEngineGlobalHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlEngineConfig {
    pub field_configs: Option<Vec<GraphQlFieldConfig>>,
    pub data_sources: Option<Vec<GraphQlEngineDataSource>>,
    pub global_headers: Option<Vec<GraphQlEngineGlobalHeader>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlProxyConfig {
    pub auth_headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlSubgraphConfig {
    pub sdl: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlSubgraphEntity {
    pub api_id: String,
    pub name: String,
    pub url: String,
    pub sdl: String,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlSupergraphConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subgraphs: Vec<GraphQlSubgraphEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_sdl: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub global_headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_query_batching: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlIntrospectionConfig {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Root configuration of a GraphQL API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQlConfig {
    pub enabled: bool,
    /// `proxyOnly`, `executionEngine`, `supergraph` or `subgraph`
    pub execution_mode: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_schema_update: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_field_configurations: Vec<Value>,
    pub playground: GraphQlPlayground,
    pub engine: GraphQlEngineConfig,
    pub proxy: GraphQlProxyConfig,
    pub subgraph: GraphQlSubgraphConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_ref: Option<String>,
    pub supergraph: GraphQlSupergraphConfig,
    pub introspection: GraphQlIntrospectionConfig,
}

/// A single proxied API and its versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDefinitionSpec {
    /// Assigned by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Links the resource to an existing API when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    pub name: String,
    /// Overwritten by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub proxy: Proxy,
    pub listen_port: i64,
    /// `""`, `h2c`, `tcp`, `tls`, `http` or `https`
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_proxy_protocol: Option<bool>,
    /// Custom host header the gateway listens on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_track: Option<bool>,
    #[serde(rename = "use_keyless", skip_serializing_if = "Option::is_none")]
    pub use_keyless_access: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_oauth2: Option<bool>,
    #[serde(rename = "oauth_meta", skip_serializing_if = "Option::is_none")]
    pub oauth2_meta: Option<OAuth2Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_auth_data: Option<bool>,
    pub auth: AuthConfig,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub auth_configs: HashMap<String, AuthConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_standard_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_basic_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_mutual_tls_auth: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub client_certificates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub client_certificate_refs: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pinned_public_keys: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub pinned_public_keys_refs: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub upstream_certificates: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub upstream_certificate_refs: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_jwt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_go_plugin_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_coprocess_auth: Option<bool>,
    /// `rsa`, `hmac` or `ecdsa`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_signing_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_identity_base_field: Option<String>,
    #[serde(rename = "jwt_client_base_field", skip_serializing_if = "Option::is_none")]
    pub jwt_client_id_base_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_policy_field_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jwt_default_policies: Vec<String>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub jwt_issued_at_validation_skew: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub jwt_expires_at_validation_skew: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub jwt_not_before_validation_skew: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_skip_kid: Option<bool>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub jwt_scope_to_policy_mapping: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_scope_claim_name: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_identity_provided_by: String,
    #[serde(rename = "definition")]
    pub version_definition: VersionDefinition,
    pub version_data: VersionData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_rate_limit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_quota: Option<bool>,
    pub global_rate_limit: GlobalRateLimit,
    pub custom_middleware: MiddlewareSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_middleware_bundle: Option<String>,
    pub cache_options: CacheOptions,
    /// Seconds before a session key expires
    #[serde(skip_serializing_if = "is_zero")]
    pub session_lifetime: i64,
    /// Only reachable from other APIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    #[serde(rename = "enable_ip_whitelisting", skip_serializing_if = "Option::is_none")]
    pub enable_ip_allow_listing: Option<bool>,
    #[serde(rename = "allowed_ips", skip_serializing_if = "Vec::is_empty")]
    pub allowed_ips: Vec<String>,
    #[serde(rename = "enable_ip_blacklisting", skip_serializing_if = "Option::is_none")]
    pub enable_ip_deny_listing: Option<bool>,
    #[serde(rename = "blacklisted_ips", skip_serializing_if = "Vec::is_empty")]
    pub denied_ips: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_processors: Vec<ResponseProcessor>,
    #[serde(rename = "CORS")]
    pub cors: Cors,
    /// Certificate IDs, `orgid+fingerprint`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificate_secret_names: Vec<String>,
    /// Gateway node tags that should load this API
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_context_vars: Option<bool>,
    /// Free-form attributes passed to middleware
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_detailed_recording: Option<bool>,
    #[serde(rename = "graphql", skip_serializing_if = "Option::is_none")]
    pub graphql: Option<GraphQlConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_tracing: Option<bool>,
}

impl ApiDefinitionSpec {
    pub fn api_id(&self) -> &str {
        self.api_id.as_deref().unwrap_or_default()
    }

    /// Trimmed string value of `key` in `config_data`.
    pub fn config_data_str(&self, key: &str) -> Option<&str> {
        self.config_data.as_ref()?.get(key)?.as_str().map(str::trim)
    }
}

/// A page of API definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDefinitionSpecList {
    pub apis: Vec<ApiDefinitionSpec>,
}

/// Query options accepted when listing APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListApiOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Page number, `-2` asks for every page
    #[serde(rename = "p", skip_serializing_if = "is_zero")]
    pub pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<bool>,
}

impl ListApiOptions {
    /// Every page, unfiltered.
    pub fn all_pages() -> Self {
        Self { pages: -2, ..Self::default() }
    }

    /// Query parameters for the list endpoint, sorted by name.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));

        if let Some(v) = self.compressed {
            push("compressed", v.to_string());
        }
        if let Some(v) = &self.query {
            push("q", v.clone());
        }
        if self.pages != 0 {
            push("p", self.pages.to_string());
        }
        if let Some(v) = &self.sort {
            push("sort", v.clone());
        }
        if let Some(v) = &self.category {
            push("category", v.clone());
        }
        if let Some(v) = &self.auth_type {
            push("auth_type", v.clone());
        }
        if let Some(v) = self.graph {
            push("graph", v.to_string());
        }

        params.sort();
        params
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_zero_u16(v: &u16) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_payload() {
        let spec: ApiDefinitionSpec = serde_json::from_value(json!({
            "name": "httpbin",
            "api_id": "abc",
            "use_keyless": true,
            "protocol": "http",
            "proxy": {
                "listen_path": "/httpbin",
                "target_url": "http://httpbin.org",
                "strip_listen_path": true
            },
            "version_data": {
                "not_versioned": true,
                "default_version": "Default",
                "versions": {"Default": {"name": "Default"}}
            },
            "CORS": {"enable": true, "allowed_origins": ["*"]},
            "config_data": {"k8sName": " httpbin ", "k8sNamespace": "default"},
            "some_field_we_do_not_model": 1
        }))
        .unwrap();

        assert_eq!(spec.api_id(), "abc");
        assert_eq!(spec.use_keyless_access, Some(true));
        assert_eq!(spec.proxy.listen_path.as_deref(), Some("/httpbin"));
        assert_eq!(spec.version_data.versions["Default"].name, "Default");
        assert_eq!(spec.cors.allowed_origins, vec!["*"]);
        assert_eq!(spec.config_data_str(CONFIG_DATA_NAME_KEY), Some("httpbin"));
        assert_eq!(spec.config_data_str(CONFIG_DATA_NAMESPACE_KEY), Some("default"));
        assert_eq!(spec.config_data_str("missing"), None);
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let spec = ApiDefinitionSpec {
            name: "httpbin".to_string(),
            proxy: Proxy { target_url: "http://httpbin.org".to_string(), ..Default::default() },
            ..Default::default()
        };

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["name"], "httpbin");
        assert_eq!(value["proxy"]["target_url"], "http://httpbin.org");
        assert!(value.get("api_id").is_none());
        assert!(value["proxy"].get("target_internal").is_none());
        assert!(value.get("CORS").is_some());
        assert!(value.get("config_data").is_none());

        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert!(!yaml.contains("config_data"), "{}", yaml);
    }

    #[test]
    fn test_circuit_breaker_percent() {
        let breaker: CircuitBreakerMeta = serde_json::from_value(json!({
            "path": "/pay",
            "method": "POST",
            "threshold_percent": 0.5,
            "samples": 10,
            "return_to_service_after": 60
        }))
        .unwrap();

        assert_eq!(breaker.threshold_percent.as_str(), "0.5");
        assert!(breaker.threshold_percent.matches_pattern());
    }

    #[test]
    fn test_list_options_params() {
        assert_eq!(ListApiOptions::all_pages().params(), vec![("p".to_string(), "-2".to_string())]);

        let opts = ListApiOptions {
            query: Some("orders".to_string()),
            category: Some("#payments".to_string()),
            graph: Some(false),
            ..Default::default()
        };
        assert_eq!(
            opts.params(),
            vec![
                ("category".to_string(), "#payments".to_string()),
                ("graph".to_string(), "false".to_string()),
                ("q".to_string(), "orders".to_string()),
            ]
        );
        assert!(ListApiOptions::default().params().is_empty());
    }
}
