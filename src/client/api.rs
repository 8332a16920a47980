/**
 * CampusConnect API Client
 *
 * Every method returns the `data` of the success envelope. Error envelopes
 * become `ClientError::Api` with the server's message.
 */
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::client::session::Session;
use crate::shared::config::ClientConfig;
use crate::shared::envelope::{ApiErrorBody, ApiResponse, Empty};
use crate::shared::models::*;
use crate::shared::pagination::Paginated;

/// Endpoints whose 401 means bad credentials rather than an expired session
const AUTH_PATHS: [&str; 3] = [
    "/user/login_user",
    "/user/register_user",
    "/user/refresh_access_token",
];

/// A request that can be sent again after a token refresh
#[derive(Debug, Clone)]
struct Call {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    fn page(self, page: u64, limit: u64) -> Self {
        self.param("page", page).param("limit", limit)
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn json(mut self, body: &impl Serialize) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn is_auth_endpoint(&self) -> bool {
        AUTH_PATHS.iter().any(|path| self.path.starts_with(path))
    }
}

/// Decode a success envelope, or turn an error envelope into `ClientError::Api`
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        return Ok(envelope.data);
    }

    let (message, errors) = match serde_json::from_slice::<ApiErrorBody>(&bytes) {
        Ok(body) => (body.message, body.errors),
        Err(_) => (
            status.canonical_reason().unwrap_or("Request failed").to_string(),
            Vec::new(),
        ),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        errors,
    })
}

#[derive(Debug, Clone)]
pub struct CampusClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Session,
}

impl CampusClient {
    pub fn new(config: ClientConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
        }
    }

    /// Client with a fresh session for the given API base URL
    pub fn from_base_url(base_url: &str) -> Result<Self, ClientError> {
        let config = ClientConfig::builder().base_url(base_url).build()?;
        Ok(Self::new(config, Session::default()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn dispatch(&self, call: &Call) -> Result<Response, ClientError> {
        let mut request = self.http.request(call.method.clone(), self.config.url(&call.path));
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(token) = self.session.access_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Send a call, refreshing the session and retrying once on 401
    async fn execute<T: DeserializeOwned>(&self, call: Call) -> Result<T, ClientError> {
        let response = self.dispatch(&call).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return decode(response).await;
        }

        if call.is_auth_endpoint() {
            self.session.clear().await;
            return decode(response).await;
        }

        if let Err(e) = self.refresh_session().await {
            tracing::warn!("Token refresh failed: {}", e);
            self.session.clear().await;
            return Err(ClientError::LoginRequired);
        }

        let retried = self.dispatch(&call).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            self.session.clear().await;
            return Err(ClientError::LoginRequired);
        }
        decode(retried).await
    }

    /// Rotate the token pair using the stored refresh token
    pub async fn refresh_session(&self) -> Result<TokenPair, ClientError> {
        let request = RefreshRequest {
            refresh_token: self.session.refresh_token().await,
        };
        let call = Call::post("/user/refresh_access_token").json(&request)?;
        let tokens: TokenPair = decode(self.dispatch(&call).await?).await?;
        self.session.set_tokens(tokens.clone()).await;
        Ok(tokens)
    }

    /// Load the current user for stored tokens, clearing the session on failure
    pub async fn restore_session(&self) -> Result<Option<UserProfile>, ClientError> {
        if self.session.access_token().await.is_none() {
            return Ok(None);
        }

        self.session.set_loading(true).await;
        let result = self.profile().await;
        self.session.set_loading(false).await;

        match result {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::LoginRequired) => Ok(None),
            Err(e) => {
                self.session.clear().await;
                Err(e)
            }
        }
    }

    // ---- User ----

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        let payload: AuthPayload = self
            .execute(Call::post("/user/register_user").json(request)?)
            .await?;
        self.session.sign_in(&payload).await;
        Ok(payload)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let request = LoginRequest {
            email: Some(email.trim().to_lowercase()),
            password: Some(password.to_string()),
        };
        let payload: AuthPayload = self
            .execute(Call::post("/user/login_user").json(&request)?)
            .await?;
        self.session.sign_in(&payload).await;
        Ok(payload)
    }

    /// Sign out on the server; the local session is cleared either way
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.execute::<Empty>(Call::get("/user/logout_user")).await;
        self.session.clear().await;
        result.map(|_| ())
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let user: UserProfile = self.execute(Call::get("/user/get_user_profile")).await?;
        self.session.set_user(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        let user: UserProfile = self
            .execute(Call::put("/user/update_user_profile").json(request)?)
            .await?;
        self.session.set_user(Some(user.clone())).await;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let request = ChangePasswordRequest {
            old_password: Some(old_password.to_string()),
            new_password: Some(new_password.to_string()),
        };
        self.execute::<Empty>(Call::put("/user/change_password").json(&request)?)
            .await
            .map(|_| ())
    }

    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete("/user/delete_account"))
            .await?;
        self.session.clear().await;
        Ok(())
    }

    pub async fn all_users(&self) -> Result<UserList, ClientError> {
        self.execute(Call::get("/user/get_all_users")).await
    }

    pub async fn search_users(&self, query: &UserSearchQuery) -> Result<UserSearchResult, ClientError> {
        let mut call = Call::get("/user/search_users");
        if let Some(keyword) = &query.keyword {
            call = call.param("keyword", keyword);
        }
        if let Some(role) = &query.role {
            call = call.param("role", role);
        }
        if let Some(department) = &query.department {
            call = call.param("department", department);
        }
        self.execute(call).await
    }

    // ---- Posts ----

    pub async fn all_posts(&self, page: u64, limit: u64) -> Result<Paginated<PostView>, ClientError> {
        self.execute(Call::get("/posts/all").page(page, limit)).await
    }

    pub async fn post(&self, post_id: Uuid) -> Result<PostView, ClientError> {
        self.execute(Call::get(format!("/posts/{post_id}"))).await
    }

    pub async fn user_posts(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<PostView>, ClientError> {
        self.execute(Call::get(format!("/posts/user/{user_id}")).page(page, limit))
            .await
    }

    pub async fn posts_by_tag(
        &self,
        tag: &str,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<PostView>, ClientError> {
        self.execute(Call::get(format!("/posts/tag/{}", path_segment(tag))).page(page, limit))
            .await
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<PostView, ClientError> {
        self.execute(Call::post("/posts/create").json(request)?).await
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<PostView, ClientError> {
        self.execute(Call::put(format!("/posts/{post_id}")).json(request)?)
            .await
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/posts/{post_id}")))
            .await
            .map(|_| ())
    }

    pub async fn like_post(&self, post_id: Uuid) -> Result<LikeToggle, ClientError> {
        self.execute(Call::post(format!("/posts/{post_id}/like"))).await
    }

    // ---- Comments ----

    pub async fn post_comments(
        &self,
        post_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<CommentView>, ClientError> {
        self.execute(Call::get(format!("/comments/post/{post_id}")).page(page, limit))
            .await
    }

    pub async fn create_comment(&self, post_id: Uuid, text: &str) -> Result<CommentView, ClientError> {
        let request = CommentRequest {
            text: Some(text.to_string()),
        };
        self.execute(Call::post(format!("/comments/post/{post_id}")).json(&request)?)
            .await
    }

    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        text: &str,
    ) -> Result<CommentView, ClientError> {
        let request = CommentRequest {
            text: Some(text.to_string()),
        };
        self.execute(Call::put(format!("/comments/{comment_id}")).json(&request)?)
            .await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/comments/{comment_id}")))
            .await
            .map(|_| ())
    }

    // ---- Events ----

    pub async fn all_events(&self, page: u64, limit: u64) -> Result<Paginated<EventView>, ClientError> {
        self.execute(Call::get("/events/all").page(page, limit)).await
    }

    pub async fn upcoming_events(&self) -> Result<Vec<EventView>, ClientError> {
        self.execute(Call::get("/events/upcoming")).await
    }

    pub async fn event(&self, event_id: Uuid) -> Result<EventView, ClientError> {
        self.execute(Call::get(format!("/events/{event_id}"))).await
    }

    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<EventView, ClientError> {
        self.execute(Call::post("/events/create").json(request)?).await
    }

    pub async fn update_event(
        &self,
        event_id: Uuid,
        request: &UpdateEventRequest,
    ) -> Result<EventView, ClientError> {
        self.execute(Call::put(format!("/events/{event_id}")).json(request)?)
            .await
    }

    pub async fn delete_event(&self, event_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/events/{event_id}")))
            .await
            .map(|_| ())
    }

    pub async fn attend_event(&self, event_id: Uuid) -> Result<AttendanceToggle, ClientError> {
        self.execute(Call::post(format!("/events/{event_id}/attend")))
            .await
    }

    // ---- Polls ----

    pub async fn all_polls(&self, page: u64, limit: u64) -> Result<Paginated<PollView>, ClientError> {
        self.execute(Call::get("/polls/all").page(page, limit)).await
    }

    pub async fn active_polls(&self) -> Result<Vec<PollView>, ClientError> {
        self.execute(Call::get("/polls/active")).await
    }

    pub async fn poll(&self, poll_id: Uuid) -> Result<PollView, ClientError> {
        self.execute(Call::get(format!("/polls/{poll_id}"))).await
    }

    pub async fn create_poll(&self, request: &CreatePollRequest) -> Result<PollView, ClientError> {
        self.execute(Call::post("/polls/create").json(request)?).await
    }

    pub async fn update_poll(
        &self,
        poll_id: Uuid,
        request: &UpdatePollRequest,
    ) -> Result<PollView, ClientError> {
        self.execute(Call::put(format!("/polls/{poll_id}")).json(request)?)
            .await
    }

    pub async fn delete_poll(&self, poll_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/polls/{poll_id}")))
            .await
            .map(|_| ())
    }

    pub async fn vote(&self, poll_id: Uuid, option_index: i64) -> Result<PollView, ClientError> {
        let request = VoteRequest {
            option_index: Some(option_index),
        };
        self.execute(Call::post(format!("/polls/{poll_id}/vote")).json(&request)?)
            .await
    }

    // ---- Resources ----

    pub async fn all_resources(
        &self,
        page: u64,
        limit: u64,
        course: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<Paginated<ResourceView>, ClientError> {
        let mut call = Call::get("/resources/all").page(page, limit);
        if let Some(course) = course {
            call = call.param("course", course);
        }
        if let Some(search) = search {
            call = call.param("search", search);
        }
        self.execute(call).await
    }

    pub async fn resource(&self, resource_id: Uuid) -> Result<ResourceView, ClientError> {
        self.execute(Call::get(format!("/resources/{resource_id}")))
            .await
    }

    pub async fn course_resources(
        &self,
        course_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<ResourceView>, ClientError> {
        self.execute(Call::get(format!("/resources/course/{course_id}")).page(page, limit))
            .await
    }

    pub async fn user_resources(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<ResourceView>, ClientError> {
        self.execute(Call::get(format!("/resources/user/{user_id}")).page(page, limit))
            .await
    }

    pub async fn upload_resource(
        &self,
        request: &UploadResourceRequest,
    ) -> Result<ResourceView, ClientError> {
        self.execute(Call::post("/resources/upload").json(request)?)
            .await
    }

    pub async fn update_resource(
        &self,
        resource_id: Uuid,
        request: &UpdateResourceRequest,
    ) -> Result<ResourceView, ClientError> {
        self.execute(Call::put(format!("/resources/{resource_id}")).json(request)?)
            .await
    }

    pub async fn delete_resource(&self, resource_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/resources/{resource_id}")))
            .await
            .map(|_| ())
    }

    // ---- Groups ----

    pub async fn all_groups(&self, page: u64, limit: u64) -> Result<Paginated<GroupView>, ClientError> {
        self.execute(Call::get("/groups/all").page(page, limit)).await
    }

    pub async fn group(&self, group_id: Uuid) -> Result<GroupView, ClientError> {
        self.execute(Call::get(format!("/groups/{group_id}"))).await
    }

    pub async fn create_group(&self, request: &GroupRequest) -> Result<GroupView, ClientError> {
        self.execute(Call::post("/groups/create").json(request)?).await
    }

    pub async fn update_group(
        &self,
        group_id: Uuid,
        request: &GroupRequest,
    ) -> Result<GroupView, ClientError> {
        self.execute(Call::put(format!("/groups/{group_id}")).json(request)?)
            .await
    }

    pub async fn delete_group(&self, group_id: Uuid) -> Result<(), ClientError> {
        self.execute::<Empty>(Call::delete(format!("/groups/{group_id}")))
            .await
            .map(|_| ())
    }

    pub async fn join_group(&self, group_id: Uuid) -> Result<MembershipToggle, ClientError> {
        self.execute(Call::post(format!("/groups/{group_id}/join")))
            .await
    }
}

/// Percent-encode free text for use as a single path segment
fn path_segment(value: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost") else {
        return value.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(value);
    }
    url.path().trim_start_matches('/').to_string()
}
