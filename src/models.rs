//! Wire models for the tier configuration request resource.
//!
//! Only the fields the automation reads are typed; everything else the API
//! sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A pending unit of partner-program configuration work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierConfigRequest {
    pub id: String,
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub configuration: TierConfig,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
}

impl TierConfigRequest {
    pub fn product_id(&self) -> &str {
        &self.configuration.product.id
    }

    pub fn account_id(&self) -> &str {
        &self.configuration.account.id
    }
}

/// The tier configuration a request operates on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tier_level: Option<u32>,
    #[serde(default)]
    pub account: TierAccount,
    #[serde(default)]
    pub product: Product,
    #[serde(default)]
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub external_uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One request parameter. Unset fields are left out of the update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_error: Option<String>,
}

impl Param {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach an error message the requester will see next to this parameter.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.value_error = Some(error.into());
        self
    }
}

/// A parameter to push back to the server, typed or already a raw mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamUpdate {
    Typed(Param),
    Raw(Map<String, Value>),
}

impl ParamUpdate {
    /// Convert to the plain JSON object sent on the wire. Raw mappings pass
    /// through untouched.
    pub fn into_mapping(self) -> Result<Map<String, Value>, serde_json::Error> {
        match self {
            ParamUpdate::Typed(param) => match serde_json::to_value(&param)? {
                Value::Object(map) => Ok(map),
                other => Err(serde::ser::Error::custom(format!(
                    "param {} serialized to {}, expected an object",
                    param.id, other
                ))),
            },
            ParamUpdate::Raw(map) => Ok(map),
        }
    }
}

impl From<Param> for ParamUpdate {
    fn from(param: Param) -> Self {
        ParamUpdate::Typed(param)
    }
}

impl From<Map<String, Value>> for ParamUpdate {
    fn from(map: Map<String, Value>) -> Self {
        ParamUpdate::Raw(map)
    }
}

/// The two approval payload shapes a processor can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Rendered markdown shown to the requester.
    Tile(String),
    /// Id of a preconfigured activation template.
    Template(String),
}

impl Activation {
    /// Body of the approve call.
    pub fn approval_params(&self) -> Value {
        match self {
            Activation::Tile(tile) => serde_json::json!({
                "template": { "representation": tile }
            }),
            Activation::Template(id) => serde_json::json!({
                "template": { "id": id }
            }),
        }
    }

    /// The tile text or template id, whichever this carries.
    pub fn payload(&self) -> &str {
        match self {
            Activation::Tile(tile) => tile,
            Activation::Template(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_request_ignores_unknown_fields() {
        let raw = json!({
            "id": "TCR-000-000-000",
            "type": "setup",
            "status": "pending",
            "events": {"created": {"at": "2019-01-01"}},
            "configuration": {
                "id": "TC-000-000-000",
                "tier_level": 1,
                "account": {"id": "TA-1", "external_uid": "ext-1"},
                "product": {"id": "PRD-1", "name": "Cloud"},
                "connection": {"id": "CT-1"}
            },
            "params": [{"id": "p1", "value": "v"}]
        });

        let request: TierConfigRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(request.id, "TCR-000-000-000");
        assert_eq!(request.request_type, "setup");
        assert_eq!(request.product_id(), "PRD-1");
        assert_eq!(request.account_id(), "TA-1");
        assert_eq!(request.configuration.tier_level, Some(1));
        assert_eq!(request.params[0].value.as_deref(), Some("v"));
        assert!(request.assignee.is_none());
    }

    #[test]
    fn deserialize_minimal_request() {
        let request: TierConfigRequest = serde_json::from_value(json!({"id": "TCR-1"})).unwrap();
        assert_eq!(request.product_id(), "");
        assert!(request.params.is_empty());
    }

    #[test]
    fn typed_param_skips_unset_fields() {
        let map = ParamUpdate::from(Param::new("email").with_value("a@b.c")).into_mapping().unwrap();
        assert_eq!(Value::Object(map), json!({"id": "email", "value": "a@b.c"}));
    }

    #[test]
    fn typed_param_with_error() {
        let map = ParamUpdate::from(Param::new("email").with_error("invalid address")).into_mapping().unwrap();
        assert_eq!(map["value_error"], "invalid address");
        assert!(!map.contains_key("value"));
    }

    #[test]
    fn raw_param_passes_through() {
        let mut raw = Map::new();
        raw.insert("id".to_string(), json!("x"));
        raw.insert("custom".to_string(), json!([1, 2]));
        let map = ParamUpdate::from(raw.clone()).into_mapping().unwrap();
        assert_eq!(map, raw);
    }

    #[test]
    fn tile_approval_params() {
        let params = Activation::Tile("# Welcome".to_string()).approval_params();
        assert_eq!(params, json!({"template": {"representation": "# Welcome"}}));
    }

    #[test]
    fn template_approval_params() {
        let params = Activation::Template("TL-123".to_string()).approval_params();
        assert_eq!(params, json!({"template": {"id": "TL-123"}}));
    }
}
