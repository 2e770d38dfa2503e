//! Structural schema of the `KuberhealthyCheck` custom resource.
//!
//! Only decodability matters to the webhook: a payload is admitted when it
//! can be deserialized into [`KuberhealthyCheck`]. The field values are not
//! inspected.

use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const KHCHECK_GROUP: &str = "comcast.github.io";
pub const KHCHECK_VERSION: &str = "v1";
pub const KHCHECK_RESOURCE: &str = "khchecks";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KuberhealthyCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: CheckConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
}

/// Desired state of a check: how often it runs, how long it may take and
/// the pod that carries it out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    pub run_interval: String,
    pub timeout: String,
    pub pod_spec: PodSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_annotations: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_labels: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn decode_minimal_check() {
        let check: KuberhealthyCheck = serde_json::from_value(json!({
            "apiVersion": "comcast.github.io/v1",
            "kind": "KuberhealthyCheck",
            "metadata": {"name": "pod-restarts", "namespace": "kuberhealthy"},
            "spec": {
                "runInterval": "5m",
                "timeout": "10m",
                "podSpec": {
                    "containers": [{"name": "main", "image": "kuberhealthy/pod-restarts-check:v2.3.0"}]
                }
            }
        }))
        .expect("minimal check should decode");

        assert_eq!(check.metadata.name.as_deref(), Some("pod-restarts"));
        assert_eq!(check.spec.run_interval, "5m");
        assert_eq!(check.spec.pod_spec.containers.len(), 1);
        assert!(check.spec.extra_labels.is_none());
    }

    #[rstest]
    #[case::no_spec(json!({"malformed": true}))]
    #[case::no_pod_spec(json!({"spec": {"runInterval": "5m", "timeout": "10m"}}))]
    #[case::wrong_type(json!({"spec": {"runInterval": 5, "timeout": "10m", "podSpec": {"containers": []}}}))]
    #[case::not_an_object(json!("khcheck"))]
    fn reject_malformed_check(#[case] payload: serde_json::Value) {
        assert!(serde_json::from_value::<KuberhealthyCheck>(payload).is_err());
    }
}
