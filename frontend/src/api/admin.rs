use std::marker::PhantomData;

use serde::Serialize;
use teranga_shared::protocol::{ActiveToggle, AdminResource, CommunityFlags, StatsRequest};
use teranga_shared::{Community, DashboardStats, Event, Formation, Service, User};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// 某一类资源的管理端 CRUD
pub struct Collection<T: AdminResource> {
    client: ApiClient,
    _marker: PhantomData<T>,
}

impl<T: AdminResource> Collection<T> {
    fn new(client: ApiClient) -> Self {
        Self {
            client,
            _marker: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", T::COLLECTION, id)
    }

    pub async fn list(&self) -> ApiResult<Vec<T>> {
        self.client.get(T::COLLECTION).await
    }

    pub async fn create<B: Serialize>(&self, draft: &B) -> ApiResult<T> {
        self.client.post(T::COLLECTION, draft).await
    }

    pub async fn update<B: Serialize>(&self, id: &str, changes: &B) -> ApiResult<T> {
        self.client.put(&Self::item_path(id), changes).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&Self::item_path(id)).await
    }
}

/// 管理端 API（服务端按角色鉴权）
#[derive(Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        self.client.send_api(&StatsRequest).await
    }

    /// 按资源类型取集合，供泛型列表页使用
    pub fn collection<T: AdminResource>(&self) -> Collection<T> {
        Collection::new(self.client.clone())
    }

    pub fn users(&self) -> Collection<User> {
        self.collection()
    }

    pub fn events(&self) -> Collection<Event> {
        self.collection()
    }

    pub fn formations(&self) -> Collection<Formation> {
        self.collection()
    }

    pub fn services(&self) -> Collection<Service> {
        self.collection()
    }

    pub fn communities(&self) -> Collection<Community> {
        self.collection()
    }

    /// 启用/停用切换
    pub async fn set_active<T: AdminResource>(&self, id: &str, is_active: bool) -> ApiResult<T> {
        self.collection::<T>().update(id, &ActiveToggle { is_active }).await
    }

    /// 启用/停用、公开/私有切换
    pub async fn set_community_flags(&self, id: &str, flags: &CommunityFlags) -> ApiResult<Community> {
        self.communities().update(id, flags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::web::http::tests::MockTransport;
    use crate::web::storage::{MemoryTokenStore, TokenStore};
    use serde_json::json;
    use std::rc::Rc;

    fn setup() -> (MockTransport, MemoryTokenStore, AdminApi) {
        let transport = MockTransport::new();
        let store = MemoryTokenStore::with_token("admin-token");
        let client = ApiClient::new(
            "https://api.test/api",
            Rc::new(transport.clone()),
            Rc::new(store.clone()),
        );
        (transport, store, AdminApi::new(client))
    }

    #[tokio::test]
    async fn test_collection_paths_and_methods() {
        let (transport, _, api) = setup();
        transport
            .respond(200, r#"{"data":[{"_id":"e1","title":"Journée d'intégration"}]}"#)
            .respond(201, r#"{"_id":"e2","title":"Hackathon"}"#)
            .respond(200, r#"{"_id":"e2","title":"Hackathon 2"}"#)
            .respond(204, "");

        let events = api.events().list().await.unwrap();
        assert_eq!(events[0].title, "Journée d'intégration");

        let created = api.events().create(&json!({"title": "Hackathon"})).await.unwrap();
        assert_eq!(created.id, "e2");

        let updated = api
            .events()
            .update("e2", &json!({"title": "Hackathon 2"}))
            .await
            .unwrap();
        assert_eq!(updated.title, "Hackathon 2");

        api.events().delete("e2").await.unwrap();

        let requests = transport.requests.borrow();
        let summary: Vec<(String, String)> = requests
            .iter()
            .map(|r| (r.method.as_str().to_string(), r.url.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("GET".into(), "https://api.test/api/admin/events".into()),
                ("POST".into(), "https://api.test/api/admin/events".into()),
                ("PUT".into(), "https://api.test/api/admin/events/e2".into()),
                ("DELETE".into(), "https://api.test/api/admin/events/e2".into()),
            ]
        );
        assert!(requests.iter().all(|r| r.header("Authorization") == Some("Bearer admin-token")));
    }

    #[tokio::test]
    async fn test_stats_tolerates_missing_fields() {
        let (transport, _, api) = setup();
        transport.respond(200, r#"{"totalUsers":12,"activeUsers":9}"#);

        let stats = api.stats().await.unwrap();
        assert_eq!(stats.total_users, 12);
        assert_eq!(stats.total_communities, 0);
        assert!(stats.recent_users.is_empty());
    }

    #[tokio::test]
    async fn test_admin_list_401_invalidates() {
        let (transport, store, api) = setup();
        transport.respond(401, "");

        let err = api.users().list().await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_community_flags_body() {
        let (transport, _, api) = setup();
        transport.respond(200, r#"{"_id":"c1","name":"Club Robotique","isPublic":true}"#);

        let flags = CommunityFlags {
            is_active: None,
            is_public: Some(true),
        };
        let community = api.set_community_flags("c1", &flags).await.unwrap();
        assert!(community.is_public);

        let req = transport.last_request().unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"isPublic":true}"#));
        assert!(req.url.ends_with("/admin/communities/c1"));
    }

    #[tokio::test]
    async fn test_set_active_puts_toggle_on_item() {
        let (transport, _, api) = setup();
        transport.respond(200, r#"{"_id":"u7","fullName":"Fatou Sow","isActive":false}"#);

        let user: User = api.set_active("u7", false).await.unwrap();
        assert!(!user.is_active);

        let req = transport.last_request().unwrap();
        assert_eq!(req.method.as_str(), "PUT");
        assert_eq!(req.url, "https://api.test/api/admin/users/u7");
        assert_eq!(req.body.as_deref(), Some(r#"{"isActive":false}"#));
    }

    #[tokio::test]
    async fn test_delete_community_hits_admin_item() {
        let (transport, _, api) = setup();
        transport.respond(204, "");

        api.collection::<Community>().delete("c9").await.unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.method.as_str(), "DELETE");
        assert_eq!(req.url, "https://api.test/api/admin/communities/c9");
    }
}
