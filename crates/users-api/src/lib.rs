//! JSON-API user resources: profiles with derived social links, institution
//! affiliations, education and employment history, and addon settings.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod notifier;
pub mod serializers;
pub mod social;
pub mod urls;
pub mod util;
pub mod validation;

pub use config::ApiConfig;
pub use context::RequestContext;
pub use error::{ApiError, ApiResult};
