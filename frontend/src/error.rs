//! 错误类型
//!
//! 对应前端可见的四类失败：传输失败、会话失效、后端拒绝、响应格式异常，
//! 以及本地的表单校验与存储失败。

use teranga_shared::Role;
use teranga_shared::envelope::ErrorBody;
use thiserror::Error;

/// 后端没有给出可读消息时使用的兜底文案
pub const GENERIC_FAILURE: &str = "Une erreur est survenue. Veuillez réessayer.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 网络/传输层失败，不重试
    #[error("Erreur réseau : {0}")]
    Network(String),

    /// 401：会话已被全局清除
    #[error("Session expirée, veuillez vous reconnecter.")]
    Unauthorized,

    /// 后端的校验或业务拒绝，消息原样展示
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 响应结构不符合预期
    #[error("Réponse inattendue du serveur : {0}")]
    Malformed(String),

    /// 仅管理员策略下，非管理员角色登录被拒绝
    #[error("Accès réservé aux administrateurs (rôle : {0}).")]
    RoleNotAllowed(Role),

    /// 客户端表单校验（仅提示性质，以后端为准）
    #[error("{0}")]
    Validation(String),

    /// 持久化存储写入失败
    #[error("Stockage local indisponible : {0}")]
    Storage(String),
}

impl ApiError {
    /// 由非 2xx 响应构造拒绝错误，尽量提取后端消息
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = ErrorBody::extract_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        ApiError::Rejected { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 可直接展示在表单中的消息
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Malformed(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
