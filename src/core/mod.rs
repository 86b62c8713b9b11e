pub mod auth;
pub mod context;
pub mod guard;
pub mod menu;
pub mod request;
pub mod session;

pub use auth::{AuthService, ChangePasswordParams, LoginParams};
pub use context::AppContext;
pub use guard::{AccessGuard, GuardDecision, NavigationTarget};
pub use menu::{BackendMenu, MenuTransformer, RouteRecord};
pub use request::{BaseClient, RequestClient, RequestSpec};
pub use session::{AccessStore, SessionFile};
