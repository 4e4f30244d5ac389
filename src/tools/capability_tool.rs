//! Capability dispatcher.
//!
//! One `CapabilityTool` per catalog row: it normalizes the raw input against
//! the row's declared parameters, maps them onto the query string, and hands
//! the request to the shared [`Fetcher`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::base_tool::{BaseTool, EnvVar};
use super::tool_input::{normalize, QueryParams, ToolInput};
use crate::catalog::{Capability, ParamDefault, QueryBinding};
use crate::http::Fetcher;
use crate::utilities::config::Settings;
use crate::utilities::errors::FetchResult;

/// A catalog capability bound to settings and a fetcher.
#[derive(Debug, Clone)]
pub struct CapabilityTool {
    capability: &'static Capability,
    settings: Arc<Settings>,
    fetcher: Arc<Fetcher>,
}

impl CapabilityTool {
    pub fn new(capability: &'static Capability, settings: Arc<Settings>, fetcher: Arc<Fetcher>) -> Self {
        Self {
            capability,
            settings,
            fetcher,
        }
    }

    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    /// Fully qualified endpoint URL.
    pub fn url(&self) -> String {
        let endpoint = &self.capability.endpoint;
        self.settings.resolve(endpoint.service, endpoint.path)
    }

    /// Query-string pairs for a normalized parameter set, credential included.
    pub fn build_query(&self, params: &QueryParams) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.capability.query.len() + 1);

        for binding in self.capability.query {
            match binding {
                QueryBinding::Coordinates { key } => {
                    if let (Some(lat), Some(lon)) = (params.get("latitude"), params.get("longitude")) {
                        query.push((key.to_string(), format!("{},{}", lat, lon)));
                    }
                }
                QueryBinding::Param { key, param } => {
                    if let Some(value) = params.get(param) {
                        query.push((key.to_string(), value.to_string()));
                    }
                }
            }
        }

        if let Some((param, value)) = self.settings.credential(self.capability.endpoint.service) {
            query.push((param.to_string(), value.to_string()));
        }

        query
    }
}

#[async_trait]
impl BaseTool for CapabilityTool {
    fn name(&self) -> &str {
        self.capability.name
    }

    fn description(&self) -> &str {
        self.capability.description
    }

    fn args_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in self.capability.required {
            properties.insert(
                spec.name.to_string(),
                serde_json::json!({
                    "type": spec.kind.schema_type(),
                    "description": spec.description,
                }),
            );
        }
        for opt in self.capability.optional {
            let default = match opt.default {
                ParamDefault::Count(n) => Value::from(n),
                ParamDefault::Text(s) => Value::from(s),
            };
            properties.insert(
                opt.spec.name.to_string(),
                serde_json::json!({
                    "type": opt.spec.kind.schema_type(),
                    "description": opt.spec.description,
                    "default": default,
                }),
            );
        }

        let required: Vec<&str> = self.capability.required.iter().map(|p| p.name).collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        let service = self.capability.endpoint.service;
        match (service.credential_env(), service.credential_param()) {
            (Some(env), Some(param)) => vec![EnvVar::optional(
                env,
                format!("API key sent as the '{}' query parameter", param),
            )],
            _ => Vec::new(),
        }
    }

    async fn invoke(&self, input: ToolInput) -> FetchResult {
        let params = normalize(&input, self.capability.required, self.capability.optional)?;
        let query = self.build_query(&params);

        self.fetcher
            .fetch(self.capability.resource, &self.url(), &query)
            .await
    }
}
