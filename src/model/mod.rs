//! # Model
//!
//! Payloads exchanged with the gateway and the dashboard, and the custom
//! resources that carry them inside the cluster.
//!
//! Values serialize with plain serde for custom resources. Anything sent to a
//! backend goes through [`wire`], which writes [`Float64`] and [`Percent`] as
//! JSON numbers.

pub mod api_definition;
pub mod numeric;
pub mod operator_context;
pub mod portal;
pub mod resolution;
pub mod resources;
pub mod result;
pub mod security_policy;
pub mod target;
pub mod wire;

pub use api_definition::{ApiDefinitionSpec, ApiDefinitionSpecList, ListApiOptions};
pub use numeric::{Float64, Percent, PERCENT_PATTERN};
pub use operator_context::{Environment, Ingress, OperatorContextSpec, OperatorContextStatus};
pub use portal::{ApiCatalogue, ApiDescription, ApiDocumentation, PortalConfig};
pub use resolution::ResolvedSpec;
pub use result::ApiResult;
pub use security_policy::{AccessDefinition, SecurityPolicySpec};
pub use target::{decode_internal_url, InternalUrl, NamespacedName, RewriteToInternal, Target, TargetInternal};
pub use wire::{to_wire_string, to_wire_value, to_wire_vec};
