//! 响应信封解析
//!
//! 后端的每个端点要么直接返回数据，要么包装为 `{ "data": ... }`。
//! 这里把两种形态统一成同一个 Rust 类型，调用方无需关心。

use crate::User;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// `{ data: T }` 或 `T`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(value) => value,
        }
    }
}

/// 解析一个可能带信封的 JSON 响应体
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str::<Payload<T>>(body).map(Payload::into_inner)
}

/// `/auth/me` 的两种形态：`{ user: U }` 或 `U`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PrincipalBody {
    Nested { user: User },
    Bare(User),
}

impl PrincipalBody {
    pub fn into_user(self) -> User {
        match self {
            PrincipalBody::Nested { user } => user,
            PrincipalBody::Bare(user) => user,
        }
    }
}

// =========================================================
// 错误响应体
// =========================================================

#[derive(Debug, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 后端的错误响应体，兼容 `{message}`、`{error}` 与 `{errors:[{msg}]}`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl ErrorBody {
    /// 从响应体中提取可展示的错误消息；无法解析时返回 `None`
    pub fn extract_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.into_message()
    }

    pub fn into_message(self) -> Option<String> {
        let non_empty = |s: &String| !s.trim().is_empty();
        if let Some(message) = self.message.filter(non_empty) {
            return Some(message);
        }
        if let Some(error) = self.error.filter(non_empty) {
            return Some(error);
        }
        let joined: Vec<String> = self
            .errors
            .into_iter()
            .filter_map(|e| e.msg.or(e.message))
            .filter(non_empty)
            .collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, Service};

    #[test]
    fn test_decode_wrapped_and_bare_lists() {
        let wrapped = r#"{"success":true,"data":[{"_id":"s1","title":"Logement"}]}"#;
        let bare = r#"[{"_id":"s1","title":"Logement"}]"#;

        let a: Vec<Service> = decode(wrapped).unwrap();
        let b: Vec<Service> = decode(bare).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].title, "Logement");
    }

    #[test]
    fn test_decode_empty_list() {
        let list: Vec<Service> = decode("[]").unwrap();
        assert!(list.is_empty());
        let list: Vec<Service> = decode(r#"{"data":[]}"#).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_decode_rejects_unexpected_shape() {
        assert!(decode::<Vec<Service>>(r#"{"items":[]}"#).is_err());
        assert!(decode::<Vec<Service>>("not json").is_err());
    }

    #[test]
    fn test_principal_body_shapes() {
        let nested = r#"{"user":{"_id":"u1","fullName":"Aïda Ndiaye","role":"admin"}}"#;
        let bare = r#"{"_id":"u1","fullName":"Aïda Ndiaye","role":"admin"}"#;
        let wrapped = r#"{"data":{"user":{"_id":"u1","fullName":"Aïda Ndiaye","role":"admin"}}}"#;

        for body in [nested, bare, wrapped] {
            let user = decode::<PrincipalBody>(body).unwrap().into_user();
            assert_eq!(user.full_name, "Aïda Ndiaye");
            assert_eq!(user.role, Role::Admin);
        }
    }

    #[test]
    fn test_error_body_variants() {
        assert_eq!(
            ErrorBody::extract_message(r#"{"message":"Numéro déjà utilisé"}"#).as_deref(),
            Some("Numéro déjà utilisé")
        );
        assert_eq!(
            ErrorBody::extract_message(r#"{"error":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            ErrorBody::extract_message(
                r#"{"errors":[{"msg":"Password too short"},{"msg":"Passwords do not match"}]}"#
            )
            .as_deref(),
            Some("Password too short, Passwords do not match")
        );
        assert_eq!(ErrorBody::extract_message(r#"{"message":"  "}"#), None);
        assert_eq!(ErrorBody::extract_message("<html>502</html>"), None);
    }
}
