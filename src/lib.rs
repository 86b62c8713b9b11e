pub mod api;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "mock")]
pub mod mock;
pub mod utils;

pub use crate::api::{AdminApi, EntityApi};
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, AppConfig};
pub use crate::core::{
    AccessGuard, AccessStore, AppContext, AuthService, RequestClient, SessionFile,
};
pub use crate::domain::entities::{Entity, Record};
pub use crate::domain::model::{ListQuery, ListResult};
pub use crate::utils::error::{ApiError, Result};
