//! Campus Téranga 共享数据模型
//!
//! 后端 REST 契约的纯数据描述，不包含任何 I/O。
//! 字段命名遵循后端的 camelCase，文档 ID 使用 `_id`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod envelope;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化令牌在浏览器存储中的固定键名
pub const TOKEN_STORAGE_KEY: &str = "adminToken";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 身份与角色 (Principal)
// =========================================================

/// 角色集合（封闭）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// 是否可以进入管理界面
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// 界面展示用的标签，如 "super admin"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已认证用户的快照 (Principal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,

    // 个人资料（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// 头像占位用的首字母
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = self.full_name.split_whitespace().collect();
        match parts.as_slice() {
            [] => "?".to_string(),
            [single] => single.chars().take(2).collect::<String>().to_uppercase(),
            [first, .., last] => first
                .chars()
                .take(1)
                .chain(last.chars().take(1))
                .collect::<String>()
                .to_uppercase(),
        }
    }
}

fn default_true() -> bool {
    true
}

// =========================================================
// 内容模型 (Content)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventLocation {
    pub name: String,
    pub address: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organizer {
    pub name: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: EventLocation,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub organizer: Organizer,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub registered_users: Vec<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// =========================================================
// 社区 (Communities)
// =========================================================

/// 成员引用：后端可能返回已展开的用户对象，也可能只返回 ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRef {
    Populated(MemberUser),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl MemberRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            MemberRef::Populated(user) => user.id.as_deref(),
            MemberRef::Id(id) => Some(id),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            MemberRef::Populated(user) => user.full_name.as_deref(),
            MemberRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    pub user: MemberRef,
    /// "owner" | "moderator" | "member"
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<MemberRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub creator: Option<MemberRef>,
    #[serde(default)]
    pub members: Vec<CommunityMember>,
    #[serde(default)]
    pub posts: Vec<CommunityPost>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Community {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members
            .iter()
            .any(|member| member.user.id() == Some(user_id))
    }
}

// =========================================================
// 仪表盘 (Dashboard)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_events: u64,
    pub total_formations: u64,
    pub total_services: u64,
    pub total_communities: u64,
    pub active_users: u64,
    pub recent_users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let role: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
        assert!(role.is_admin());
        assert!(!Role::User.is_admin());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::SuperAdmin.label(), "super admin");
    }

    #[test]
    fn test_user_from_backend_document() {
        let json = r#"{
            "_id": "64f0c1",
            "fullName": "Aïda Ndiaye",
            "phoneNumber": "+221771234567",
            "email": "aida@example.sn",
            "role": "user",
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "64f0c1");
        assert_eq!(user.full_name, "Aïda Ndiaye");
        assert_eq!(user.role, Role::User);
        assert!(user.created_at.is_some());
        assert_eq!(user.initials(), "AN");
    }

    #[test]
    fn test_user_accepts_plain_id_and_defaults() {
        let user: User = serde_json::from_str(r#"{"id":"u1","fullName":"Moussa"}"#).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::User);
        assert!(user.is_active);
        assert_eq!(user.initials(), "MO");
    }

    #[test]
    fn test_community_membership_with_mixed_refs() {
        let json = r#"{
            "_id": "c1",
            "name": "Étudiants de Dakar",
            "isApproved": true,
            "members": [
                {"user": {"_id": "u1", "fullName": "Awa"}, "role": "owner"},
                {"user": "u2", "role": "member"}
            ]
        }"#;
        let community: Community = serde_json::from_str(json).unwrap();
        assert!(community.has_member("u1"));
        assert!(community.has_member("u2"));
        assert!(!community.has_member("u3"));
        assert_eq!(community.members[0].user.display_name(), Some("Awa"));
    }

    #[test]
    fn test_formation_accepts_name_alias() {
        let formation: Formation =
            serde_json::from_str(r#"{"_id":"f1","name":"Licence Informatique","shortName":"L-INFO"}"#)
                .unwrap();
        assert_eq!(formation.title, "Licence Informatique");
        assert_eq!(formation.short_name.as_deref(), Some("L-INFO"));
    }
}
