//! Resolution of in-cluster references into `tyk://` URLs.

use proptest::prelude::*;
use serde_json::json;
use tyk_operator::model::{decode_internal_url, ApiDefinitionSpec, Target, TargetInternal};

fn spec_with_rewrites() -> ApiDefinitionSpec {
    serde_json::from_value(json!({
        "name": "gateway",
        "proxy": {
            "listen_path": "/",
            "target_internal": {"target": {"name": "front", "namespace": "edge"}}
        },
        "version_data": {
            "not_versioned": true,
            "versions": {
                "v2": {
                    "name": "v2",
                    "extended_paths": {
                        "url_rewrites": [{
                            "path": "/users",
                            "method": "GET",
                            "match_pattern": "/users(.*)",
                            "rewrite_to_internal": {"target": {"name": "users"}, "path": "/list"}
                        }]
                    }
                },
                "Default": {
                    "name": "Default",
                    "extended_paths": {
                        "url_rewrites": [{
                            "path": "/orders",
                            "method": "GET",
                            "match_pattern": "/orders(.*)",
                            "rewrite_to": "http://fallback",
                            "triggers": [
                                {"on": "any", "rewrite_to_internal": {"target": {"name": "orders"}, "path": "/a b"}},
                                {"on": "all", "rewrite_to": "http://kept"}
                            ]
                        }]
                    }
                }
            }
        }
    }))
    .unwrap()
}

#[test]
fn test_targets_are_found_in_traversal_order() {
    let resolved = spec_with_rewrites().resolve_internal_targets();

    assert_eq!(
        resolved.targets,
        vec![Target::namespaced("edge", "front"), Target::new("orders"), Target::new("users")]
    );

    let spec = &resolved.spec;
    assert!(spec.proxy.target_internal.is_none());
    assert_eq!(decode_internal_url(&spec.proxy.target_url).unwrap().target, Target::namespaced("edge", "front"));

    let default = spec.version_data.versions["Default"].extended_paths.as_ref().unwrap();
    let rewrite = &default.url_rewrite[0];
    assert_eq!(rewrite.rewrite_to.as_deref(), Some("http://fallback"));
    assert_eq!(rewrite.triggers[0].rewrite_to.as_deref(), Some("tyk://b3JkZXJz/a%20b"));
    assert!(rewrite.triggers[0].rewrite_to_internal.is_none());
    assert_eq!(rewrite.triggers[1].rewrite_to.as_deref(), Some("http://kept"));

    let v2 = spec.version_data.versions["v2"].extended_paths.as_ref().unwrap();
    assert_eq!(v2.url_rewrite[0].rewrite_to.as_deref(), Some("tyk://dXNlcnM/list"));
}

#[test]
fn test_resolution_is_idempotent() {
    let resolved = spec_with_rewrites().resolve_internal_targets();
    let again = resolved.spec.resolve_internal_targets();

    assert!(again.targets.is_empty());
    assert_eq!(again.spec, resolved.spec);
}

#[test]
fn test_spec_without_references_is_unchanged() {
    let spec: ApiDefinitionSpec = serde_json::from_value(json!({
        "name": "httpbin",
        "proxy": {"listen_path": "/httpbin", "target_url": "http://httpbin.org"}
    }))
    .unwrap();

    let resolved = spec.resolve_internal_targets();
    assert!(resolved.targets.is_empty());
    assert_eq!(resolved.spec, spec);
}

proptest! {
    #[test]
    fn prop_internal_url_decodes_to_its_target(
        name in "[a-z0-9]([-a-z0-9]{0,30}[a-z0-9])?",
        namespace in proptest::option::of("[a-z0-9]([-a-z0-9]{0,30}[a-z0-9])?"),
        path in "(/[a-z0-9]{1,8}){1,3}",
    ) {
        let internal = TargetInternal {
            target: Target { name: name.clone(), namespace: namespace.clone() },
            path: Some(path.clone()),
            query: None,
        };

        let decoded = decode_internal_url(&internal.to_internal_url()).unwrap();
        prop_assert!(decoded.target.equal(&internal.target));
        prop_assert_eq!(decoded.target.name, name);
        prop_assert_eq!(decoded.target.namespace, namespace);
        prop_assert_eq!(decoded.path, path);
    }
}
