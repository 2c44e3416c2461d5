//! 运行时配置
//!
//! 前端没有运行时环境变量，配置在编译期通过 `option_env!` 注入，
//! 读不到则使用默认值。

use crate::session::RolePolicy;
use teranga_shared::TOKEN_STORAGE_KEY;

const DEFAULT_API_URL: &str = "https://campus-teranga-backend.onrender.com/api";
const DEFAULT_APP_NAME: &str = "Campus Teranga Admin";
const DEFAULT_ENVIRONMENT: &str = "production";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub role_policy: RolePolicy,
    pub token_storage_key: String,
}

impl AppConfig {
    /// 从编译期环境变量构造配置
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("TERANGA_API_URL"),
            option_env!("TERANGA_APP_NAME"),
            option_env!("TERANGA_APP_VERSION"),
            option_env!("TERANGA_ENVIRONMENT"),
            option_env!("TERANGA_ROLE_POLICY"),
        )
    }

    pub fn from_values(
        api_url: Option<&str>,
        app_name: Option<&str>,
        app_version: Option<&str>,
        environment: Option<&str>,
        role_policy: Option<&str>,
    ) -> Self {
        let role_policy = match role_policy {
            None => RolePolicy::default(),
            Some(raw) => RolePolicy::parse(raw).unwrap_or_else(|| {
                log::warn!(
                    "[Config] Unknown role policy '{}', using '{}'",
                    raw,
                    RolePolicy::default().as_str()
                );
                RolePolicy::default()
            }),
        };

        Self {
            api_base_url: normalize_base_url(api_url.unwrap_or(DEFAULT_API_URL)),
            app_name: app_name.unwrap_or(DEFAULT_APP_NAME).to_string(),
            app_version: app_version
                .unwrap_or(env!("CARGO_PKG_VERSION"))
                .to_string(),
            environment: environment.unwrap_or(DEFAULT_ENVIRONMENT).to_string(),
            role_policy,
            token_storage_key: TOKEN_STORAGE_KEY.to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == DEFAULT_ENVIRONMENT
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.is_production() {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Debug
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None, None)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
