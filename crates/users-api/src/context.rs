use std::collections::HashMap;
use std::sync::Arc;

use entity::user;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::urls::Urls;

/// Request-scoped state handed to serializers and handlers by the routing
/// layer: who is asking, the query string and the matched path parameters.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: Option<user::Model>,
    pub query: HashMap<String, String>,
    pub path: HashMap<String, String>,
    pub config: Arc<ApiConfig>,
}

impl RequestContext {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            actor: None,
            query: HashMap::new(),
            path: HashMap::new(),
            config,
        }
    }

    pub fn with_actor(mut self, actor: user::Model) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_path(mut self, key: &str, value: &str) -> Self {
        self.path.insert(key.to_string(), value.to_string());
        self
    }

    pub fn urls(&self) -> Urls {
        Urls::from_config(&self.config)
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// A query flag is set unless absent, empty, `0` or `false`.
    pub fn query_flag(&self, key: &str) -> bool {
        self.query_param(key)
            .is_some_and(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false"))
    }

    pub fn path_param(&self, key: &str) -> Result<&str, ApiError> {
        self.path
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ApiError::NotFound(format!("Missing path parameter `{key}`.")))
    }

    pub fn require_actor(&self) -> Result<&user::Model, ApiError> {
        self.actor
            .as_ref()
            .ok_or_else(|| ApiError::Forbidden("Authentication credentials were not provided.".to_string()))
    }

    /// Only the user themself may change their profile.
    pub fn require_self(&self, user_id: &str) -> Result<&user::Model, ApiError> {
        let actor = self.require_actor()?;
        if actor.id != user_id {
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ));
        }
        Ok(actor)
    }
}
