use teranga_shared::protocol::{ACTIVE_ONLY_QUERY, PublicResource};
use teranga_shared::{Event, Formation, Service};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

/// 首页与落地页展示的公开内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicOverview {
    pub formations: Vec<Formation>,
    pub events: Vec<Event>,
    pub services: Vec<Service>,
}

#[derive(Clone)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn active<T: PublicResource>(&self) -> ApiResult<Vec<T>> {
        let path = format!("{}?{}", T::PATH, ACTIVE_ONLY_QUERY);
        self.client.get(&path).await
    }

    pub async fn formations(&self) -> ApiResult<Vec<Formation>> {
        self.active().await
    }

    pub async fn events(&self) -> ApiResult<Vec<Event>> {
        self.active().await
    }

    pub async fn services(&self) -> ApiResult<Vec<Service>> {
        self.active().await
    }

    /// 并发获取三类内容；单个列表失败时降级为空列表
    pub async fn overview(&self) -> PublicOverview {
        let (formations, events, services) =
            futures::join!(self.formations(), self.events(), self.services());

        let report = |label: &str, e: ApiError| {
            log::warn!("[Public] failed to load {}: {}", label, e);
        };

        PublicOverview {
            formations: formations.unwrap_or_else(|e| {
                report("formations", e);
                Vec::new()
            }),
            events: events.unwrap_or_else(|e| {
                report("events", e);
                Vec::new()
            }),
            services: services.unwrap_or_else(|e| {
                report("services", e);
                Vec::new()
            }),
        }
    }
}
