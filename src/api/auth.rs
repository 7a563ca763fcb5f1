//! Auth Endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{LoginArgs, SignupArgs, TokenResponse, User};

impl ApiClient {
    /// `POST /auth/login` as an HTML form body
    pub async fn login(&self, args: &LoginArgs) -> ApiResult<TokenResponse> {
        let request = self.request(Method::POST, "/auth/login").form(args);
        self.execute(request, "login").await
    }

    pub async fn signup(&self, args: &SignupArgs) -> ApiResult<User> {
        let request = self.request(Method::POST, "/auth/signup").json(args);
        self.execute(request, "signup").await
    }
}
