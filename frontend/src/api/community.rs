use teranga_shared::Community;
use teranga_shared::protocol::{
    COMMUNITIES_PATH, NewCommunity, community_join_path, community_path,
};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// 社区目录与成员关系
#[derive(Clone)]
pub struct CommunityApi {
    client: ApiClient,
}

impl CommunityApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Community>> {
        self.client.get(COMMUNITIES_PATH).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Community> {
        self.client.get(&community_path(id)).await
    }

    /// 加入社区；成功后调用方应重新拉取详情
    pub async fn join(&self, id: &str) -> ApiResult<()> {
        self.client
            .post_empty(&community_join_path(id), &serde_json::json!({}))
            .await
    }

    pub async fn create(&self, community: &NewCommunity) -> ApiResult<Community> {
        self.client.post(COMMUNITIES_PATH, community).await
    }
}
