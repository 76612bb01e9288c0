//! Rewriting in-cluster references into `tyk://` URLs before an API
//! definition is sent to the backend.
//!
//! The walk visits the proxy first, then every version in name order, then
//! each URL rewrite in order followed by its triggers in order.

use serde::Serialize;
use tracing::debug;

use super::api_definition::{ApiDefinitionSpec, Proxy, RoutingTrigger, UrlRewriteMeta};
use super::target::Target;

/// A spec with every internal reference resolved, plus the references that
/// were found, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpec {
    pub spec: ApiDefinitionSpec,
    pub targets: Vec<Target>,
}

impl ApiDefinitionSpec {
    /// Rewrite every internal reference in place and return the targets that
    /// were rewritten. A second call finds nothing.
    pub fn collect_looping_targets(&mut self) -> Vec<Target> {
        let mut targets = Vec::new();

        self.proxy.collect_looping_target(&mut targets);

        for (version, info) in self.version_data.versions.iter_mut() {
            let Some(paths) = info.extended_paths.as_mut() else {
                continue;
            };
            for rewrite in paths.url_rewrite.iter_mut() {
                let before = targets.len();
                rewrite.collect_looping_targets(&mut targets);
                if targets.len() > before {
                    debug!(
                        version = %version,
                        path = %rewrite.path,
                        resolved = targets.len() - before,
                        "Resolved internal rewrite targets"
                    );
                }
            }
        }

        targets
    }

    /// Resolve a copy of this spec, leaving `self` untouched.
    pub fn resolve_internal_targets(&self) -> ResolvedSpec {
        let mut spec = self.clone();
        let targets = spec.collect_looping_targets();
        ResolvedSpec { spec, targets }
    }
}

impl Proxy {
    fn collect_looping_target(&mut self, targets: &mut Vec<Target>) {
        if let Some(internal) = self.target_internal.take() {
            self.target_url = internal.to_internal_url();
            debug!(target = %internal.target, target_url = %self.target_url, "Resolved proxy target");
            targets.push(internal.target);
        }
    }
}

impl UrlRewriteMeta {
    fn collect_looping_targets(&mut self, targets: &mut Vec<Target>) {
        if let Some(internal) = self.rewrite_to_internal.take() {
            self.rewrite_to = Some(internal.to_internal_url());
            targets.push(internal.target);
        }

        for trigger in self.triggers.iter_mut() {
            trigger.collect_looping_target(targets);
        }
    }
}

impl RoutingTrigger {
    fn collect_looping_target(&mut self, targets: &mut Vec<Target>) {
        if let Some(internal) = self.rewrite_to_internal.take() {
            self.rewrite_to = Some(internal.to_internal_url());
            targets.push(internal.target);
        }
    }
}
