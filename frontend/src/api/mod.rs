//! 领域 API 门面
//!
//! 每个方法对应一个 REST 端点，只负责请求构造与响应解包，
//! 凭据与会话失效由 `ApiClient` 统一处理。

mod admin;
mod auth;
mod community;
mod public;

pub use admin::{AdminApi, Collection};
pub use auth::AuthApi;
pub use community::CommunityApi;
pub use public::{PublicApi, PublicOverview};
