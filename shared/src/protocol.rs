use crate::envelope::PrincipalBody;
use crate::{Community, DashboardStats, Event, Formation, Service, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request (after envelope unwrapping).
    type Response: DeserializeOwned;
    /// The URL path, relative to the API base URL.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Credential-exchange endpoints are sent without the bearer token, and
    /// a 401 from them is an ordinary rejection rather than a session expiry.
    const ANONYMOUS: bool = false;
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// 登录结果；后端返回 `{ token, user }`，也可能把用户字段平铺在 `token` 旁边
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LoginBody")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginBody {
    Nested {
        token: String,
        user: User,
    },
    Flat {
        token: String,
        #[serde(flatten)]
        user: User,
    },
}

impl From<LoginBody> for LoginResponse {
    fn from(body: LoginBody) -> Self {
        match body {
            LoginBody::Nested { token, user } | LoginBody::Flat { token, user } => {
                LoginResponse { token, user }
            }
        }
    }
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const ANONYMOUS: bool = true;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl ApiRequest for RegisterRequest {
    // 注册不返回令牌，响应体内容被忽略
    type Response = serde_json::Value;
    const PATH: &'static str = "/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const ANONYMOUS: bool = true;
}

/// Rehydrate the principal from the stored token
#[derive(Debug, Serialize, Deserialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = PrincipalBody;
    const PATH: &'static str = "/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Profile edit form; empty strings are sent as-is so the backend can clear fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub field_of_study: String,
    pub year_of_study: String,
    pub bio: String,
}

impl ProfileUpdate {
    pub fn from_user(user: &User) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            full_name: user.full_name.clone(),
            email: text(&user.email),
            phone: text(&user.phone),
            // 只保留 YYYY-MM-DD 部分，供 <input type="date"> 使用
            date_of_birth: user
                .date_of_birth
                .as_deref()
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
            address: text(&user.address),
            field_of_study: text(&user.field_of_study),
            year_of_study: text(&user.year_of_study),
            bio: text(&user.bio),
        }
    }
}

impl ApiRequest for ProfileUpdate {
    type Response = PrincipalBody;
    const PATH: &'static str = "/auth/profile";
    const METHOD: HttpMethod = HttpMethod::Put;
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsRequest;

impl ApiRequest for StatsRequest {
    type Response = DashboardStats;
    const PATH: &'static str = "/admin/stats";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// A resource manageable through the admin CRUD endpoints.
pub trait AdminResource: DeserializeOwned {
    /// Collection path; items live at `{COLLECTION}/{id}`.
    const COLLECTION: &'static str;
}

impl AdminResource for User {
    const COLLECTION: &'static str = "/admin/users";
}

impl AdminResource for Event {
    const COLLECTION: &'static str = "/admin/events";
}

impl AdminResource for Formation {
    const COLLECTION: &'static str = "/admin/formations";
}

impl AdminResource for Service {
    const COLLECTION: &'static str = "/admin/services";
}

impl AdminResource for Community {
    const COLLECTION: &'static str = "/admin/communities";
}

/// Partial update used by the per-row activation toggle of the admin lists
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveToggle {
    pub is_active: bool,
}

/// Partial update used by the community moderation toggles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

// =========================================================
// Public content
// =========================================================

/// Read-only content listed on the public site; only active items are requested.
pub trait PublicResource: DeserializeOwned {
    const PATH: &'static str;
}

impl PublicResource for Formation {
    const PATH: &'static str = "/formations";
}

impl PublicResource for Event {
    const PATH: &'static str = "/events";
}

impl PublicResource for Service {
    const PATH: &'static str = "/services";
}

pub const ACTIVE_ONLY_QUERY: &str = "isActive=true";

// =========================================================
// Communities
// =========================================================

pub const COMMUNITIES_PATH: &str = "/communities";

pub fn community_path(id: &str) -> String {
    format!("{}/{}", COMMUNITIES_PATH, id)
}

pub fn community_join_path(id: &str) -> String {
    format!("{}/{}/join", COMMUNITIES_PATH, id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_public: bool,
}
