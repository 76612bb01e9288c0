//! References from one custom resource to another, and the `tyk://` URLs they
//! turn into once resolved.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{OperatorError, Result};

/// Scheme used by the gateway for routing to APIs loaded into it.
pub const INTERNAL_SCHEME: &str = "tyk";

/// A `{name, namespace}` reference to another resource.
///
/// `namespace` is left unset when the reference should resolve against the
/// namespace of the object holding it. Derived `PartialEq` is structural; use
/// [`Target::equal`] for reference equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// A fully qualified `namespace/name` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

impl Target {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), namespace: None }
    }

    pub fn namespaced<N: Into<String>, S: Into<String>>(namespace: N, name: S) -> Self {
        Self { name: name.into(), namespace: Some(namespace.into()) }
    }

    /// Overwrite namespace and name from a `namespace/name` value. Values with
    /// no slash, or more than one, leave the target untouched.
    pub fn parse(&mut self, value: &str) {
        let parts: Vec<&str> = value.split('/').collect();
        if let [namespace, name] = parts.as_slice() {
            self.namespace = Some((*namespace).to_string());
            self.name = (*name).to_string();
        }
    }

    /// Resolve against `default_namespace` when no namespace is set.
    pub fn ns(&self, default_namespace: &str) -> NamespacedName {
        let namespace = match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns,
            _ => default_namespace,
        };

        NamespacedName { namespace: namespace.to_string(), name: self.name.clone() }
    }

    /// Names match and namespaces match, treating unset and empty as the same.
    pub fn equal(&self, other: &Target) -> bool {
        let namespace_matches = match (self.namespace.as_deref(), other.namespace.as_deref()) {
            (None, None) => true,
            (None, Some(ns)) | (Some(ns), None) => ns.is_empty(),
            (Some(a), Some(b)) => a == b,
        };

        namespace_matches && self.name == other.name
    }

    /// An unset namespace only matches `""`; a set one matches itself.
    pub fn namespace_matches(&self, namespace: &str) -> bool {
        match self.namespace.as_deref() {
            None => namespace.is_empty(),
            Some(ns) => ns == namespace,
        }
    }

    /// base64url (no padding) of the canonical form, used as the `tyk://` host.
    pub fn encoded_host(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_string())
    }

    fn from_canonical(value: &str) -> Self {
        match value.split_once('/') {
            Some((namespace, name)) => Target::namespaced(namespace, name),
            None => Target::new(value),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ns("").fmt(f)
    }
}

/// Points a proxy at another API loaded into the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInternal {
    #[serde(default)]
    pub target: Target,
    /// Path on the target, without query parameters, e.g. `/myendpoint`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Query string added to the target, e.g. `check_limits=true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl TargetInternal {
    /// The `tyk://` form. The path is written as given, without escaping.
    pub fn to_internal_url(&self) -> String {
        raw_internal_url(
            &self.target.encoded_host(),
            self.path.as_deref().unwrap_or_default(),
            self.query.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Display for TargetInternal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_internal_url())
    }
}

/// Rewrites a request to another API loaded into the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteToInternal {
    #[serde(default)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RewriteToInternal {
    /// The `tyk://` form. The path is percent-escaped like any URL path.
    pub fn to_internal_url(&self) -> String {
        escaped_internal_url(
            &self.target.encoded_host(),
            self.path.as_deref().unwrap_or_default(),
            self.query.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Display for RewriteToInternal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_internal_url())
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn with_query(mut url: String, query: &str) -> String {
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    url
}

fn raw_internal_url(host: &str, path: &str, query: &str) -> String {
    with_query(format!("{}://{}{}", INTERNAL_SCHEME, host, normalize_path(path)), query)
}

fn escaped_internal_url(host: &str, path: &str, query: &str) -> String {
    raw_internal_url(host, &escape_path(&normalize_path(path)), query)
}

/// Bytes a path segment may carry unescaped, besides ASCII alphanumerics.
const PATH_SAFE: &str = "-_.~$&+,/:;=@";

/// Percent-escape a path the way the gateway escapes a URL path: reserved
/// path characters stay literal, everything else becomes uppercase `%XX`.
fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    let mut buf = [0u8; 4];
    for c in path.chars() {
        if c.is_ascii_alphanumeric() || PATH_SAFE.contains(c) {
            escaped.push(c);
        } else {
            escaped.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    escaped
}

/// A decoded `tyk://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalUrl {
    pub target: Target,
    pub path: String,
    pub query: Option<String>,
}

/// Recover the target, path and query from a `tyk://` URL.
pub fn decode_internal_url(value: &str) -> Result<InternalUrl> {
    let url = Url::parse(value)
        .map_err(|e| OperatorError::invalid_target(value, format!("not a URL: {}", e)))?;

    if url.scheme() != INTERNAL_SCHEME {
        return Err(OperatorError::invalid_target(
            value,
            format!("expected scheme '{}', got '{}'", INTERNAL_SCHEME, url.scheme()),
        ));
    }

    let host = url.host_str().unwrap_or_default();
    let decoded = URL_SAFE_NO_PAD
        .decode(host)
        .map_err(|e| OperatorError::invalid_target(value, format!("host is not base64url: {}", e)))?;
    let canonical = String::from_utf8(decoded)
        .map_err(|e| OperatorError::invalid_target(value, format!("host is not UTF-8: {}", e)))?;

    Ok(InternalUrl {
        target: Target::from_canonical(&canonical),
        path: url.path().to_string(),
        query: url.query().map(str::to_string),
    })
}

/// True when `value` uses the `tyk://` scheme.
pub fn is_internal_url(value: &str) -> bool {
    value.starts_with(&format!("{}://", INTERNAL_SCHEME))
}
