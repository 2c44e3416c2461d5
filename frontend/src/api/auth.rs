use teranga_shared::User;
use teranga_shared::protocol::{
    LoginRequest, LoginResponse, MeRequest, ProfileUpdate, RegisterRequest,
};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 用手机号和密码换取令牌与用户快照
    pub async fn login(&self, phone_number: &str, password: &str) -> ApiResult<LoginResponse> {
        let req = LoginRequest {
            phone_number: phone_number.trim().to_string(),
            password: password.to_string(),
        };
        self.client.send_api(&req).await
    }

    /// 创建账号，不返回令牌
    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        self.client.send_api_discarding(req).await
    }

    /// 用当前令牌获取用户
    pub async fn me(&self) -> ApiResult<User> {
        let body = self.client.send_api(&MeRequest).await?;
        Ok(body.into_user())
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let body = self.client.send_api(update).await?;
        Ok(body.into_user())
    }
}
