//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、访问级别以及守卫决策。

use std::fmt::Display;

use teranga_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Register,
    /// 普通用户首页
    Home,
    /// 管理面板
    Dashboard,
    /// 管理列表 `/users`、`/events` 等
    Admin(AdminSection),
    ProfileEdit,
    /// 社区详情 `/communities/:id`
    Community(String),
    NotFound,
}

/// 管理端的资源列表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Users,
    Events,
    Formations,
    Services,
    Communities,
}

impl AdminSection {
    pub const ALL: [AdminSection; 5] = [
        AdminSection::Users,
        AdminSection::Events,
        AdminSection::Formations,
        AdminSection::Services,
        AdminSection::Communities,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AdminSection::Users => "/users",
            AdminSection::Events => "/events",
            AdminSection::Formations => "/formations",
            AdminSection::Services => "/services",
            AdminSection::Communities => "/communities",
        }
    }

    /// 导航栏中的标签
    pub fn label(&self) -> &'static str {
        match self {
            AdminSection::Users => "Utilisateurs",
            AdminSection::Events => "Événements",
            AdminSection::Formations => "Formations",
            AdminSection::Services => "Services",
            AdminSection::Communities => "Communautés",
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.path() == path)
    }
}

/// 路由所需的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// 任何人
    Public,
    /// 仅未登录用户（登录、注册）
    Guest,
    /// 任意已登录用户
    Authenticated,
    /// admin / super_admin
    Admin,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/home" => Self::Home,
            "/dashboard" => Self::Dashboard,
            "/profile/edit" => Self::ProfileEdit,
            other => {
                if let Some(section) = AdminSection::from_path(other) {
                    return Self::Admin(section);
                }
                match other.strip_prefix("/communities/") {
                    Some(id) if !id.is_empty() && !id.contains('/') => Self::Community(id.to_string()),
                    _ => Self::NotFound,
                }
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Home => "/home".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Admin(section) => section.path().to_string(),
            Self::ProfileEdit => "/profile/edit".to_string(),
            Self::Community(id) => format!("/communities/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫属性：该路由的访问级别**
    pub fn access_level(&self) -> AccessLevel {
        match self {
            Self::Login | Self::Register => AccessLevel::Guest,
            Self::Home | Self::ProfileEdit | Self::Community(_) => AccessLevel::Authenticated,
            Self::Dashboard | Self::Admin(_) => AccessLevel::Admin,
            Self::NotFound => AccessLevel::Public,
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已登录用户的落地页：管理员进入面板，其他用户进入首页
    pub fn landing_for(role: Role) -> Self {
        if role.is_admin() {
            Self::Dashboard
        } else {
            Self::Home
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 守卫
// =========================================================

/// 路由守卫看到的会话快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub is_loading: bool,
    /// 已登录用户的角色；未登录为 None
    pub role: Option<Role>,
}

impl Access {
    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }
}

/// 守卫决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 水合中：显示中性等待状态，既不渲染也不重定向
    Pending,
    Render,
    Redirect(AppRoute),
}

/// 对目标路由做一次守卫判断
pub fn guard_decision(route: &AppRoute, access: Access) -> GuardDecision {
    let level = route.access_level();
    if level == AccessLevel::Public {
        return GuardDecision::Render;
    }
    if access.is_loading {
        return GuardDecision::Pending;
    }

    match (level, access.role) {
        (AccessLevel::Guest, Some(role)) => GuardDecision::Redirect(AppRoute::landing_for(role)),
        (AccessLevel::Guest, None) => GuardDecision::Render,
        (AccessLevel::Authenticated | AccessLevel::Admin, None) => {
            GuardDecision::Redirect(AppRoute::auth_failure_redirect())
        }
        (AccessLevel::Admin, Some(role)) if !role.is_admin() => {
            GuardDecision::Redirect(AppRoute::Home)
        }
        _ => GuardDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADING: Access = Access {
        is_loading: true,
        role: None,
    };
    const ANONYMOUS: Access = Access {
        is_loading: false,
        role: None,
    };
    const USER: Access = Access {
        is_loading: false,
        role: Some(Role::User),
    };
    const ADMIN: Access = Access {
        is_loading: false,
        role: Some(Role::Admin),
    };

    #[test]
    fn test_path_round_trip_for_known_routes() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Home,
            AppRoute::Dashboard,
            AppRoute::ProfileEdit,
            AppRoute::Community("64ab".into()),
            AppRoute::Admin(AdminSection::Users),
            AppRoute::Admin(AdminSection::Services),
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_from_path_edge_cases() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/home?tab=events"), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/communities/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/communities/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn test_admin_sections_resolve_before_community_detail() {
        assert_eq!(
            AppRoute::from_path("/communities"),
            AppRoute::Admin(AdminSection::Communities)
        );
        assert_eq!(
            AppRoute::from_path("/communities/c1"),
            AppRoute::Community("c1".into())
        );
        for section in AdminSection::ALL {
            assert_eq!(AppRoute::from_path(section.path()), AppRoute::Admin(section));
        }
    }

    #[test]
    fn test_loading_is_pending_never_redirect() {
        assert_eq!(guard_decision(&AppRoute::Dashboard, LOADING), GuardDecision::Pending);
        assert_eq!(guard_decision(&AppRoute::Home, LOADING), GuardDecision::Pending);
        assert_eq!(guard_decision(&AppRoute::Login, LOADING), GuardDecision::Pending);
        assert_eq!(guard_decision(&AppRoute::NotFound, LOADING), GuardDecision::Render);
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        for route in [AppRoute::Dashboard, AppRoute::Home, AppRoute::ProfileEdit] {
            assert_eq!(
                guard_decision(&route, ANONYMOUS),
                GuardDecision::Redirect(AppRoute::Login)
            );
        }
        assert_eq!(guard_decision(&AppRoute::Login, ANONYMOUS), GuardDecision::Render);
        assert_eq!(guard_decision(&AppRoute::Register, ANONYMOUS), GuardDecision::Render);
    }

    #[test]
    fn test_role_gating() {
        assert_eq!(guard_decision(&AppRoute::Dashboard, ADMIN), GuardDecision::Render);
        assert_eq!(
            guard_decision(&AppRoute::Dashboard, USER),
            GuardDecision::Redirect(AppRoute::Home)
        );
        assert_eq!(
            guard_decision(&AppRoute::Community("c1".into()), USER),
            GuardDecision::Render
        );
        for section in AdminSection::ALL {
            let route = AppRoute::Admin(section);
            assert_eq!(guard_decision(&route, ADMIN), GuardDecision::Render);
            assert_eq!(
                guard_decision(&route, USER),
                GuardDecision::Redirect(AppRoute::Home)
            );
            assert_eq!(
                guard_decision(&route, ANONYMOUS),
                GuardDecision::Redirect(AppRoute::Login)
            );
        }
    }

    #[test]
    fn test_authenticated_leaves_guest_pages() {
        assert_eq!(
            guard_decision(&AppRoute::Login, ADMIN),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            guard_decision(&AppRoute::Register, USER),
            GuardDecision::Redirect(AppRoute::Home)
        );
    }
}
