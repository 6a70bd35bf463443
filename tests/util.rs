#![allow(unused)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    test::{call_service, read_body, read_body_json, TestRequest},
};
use anyhow::Result;
use chandabox::{setting::Setting, AppState};
use migration::{Migrator, MigratorTrait};
use serde_json::Value;

pub async fn create_test_state() -> Result<AppState> {
    dotenvy::from_filename_override(".test.env")?;
    let mut setting = Setting::from_env("CHANDABOX".to_owned())?;
    // own journal file per test, the db is already private per connection
    setting.activity.path = tempfile::tempdir()?.into_path().join("activity.json");
    let state = AppState::from_setting(setting).await?;
    Migrator::fresh(state.service.db()).await?;
    Ok(state)
}

pub fn get_req(path: &str) -> TestRequest {
    TestRequest::with_uri(path)
}

pub fn post_req(path: &str, data: Value) -> TestRequest {
    TestRequest::with_uri(path)
        .method(Method::POST)
        .set_json(data)
}

pub fn put_req(path: &str, data: Value) -> TestRequest {
    TestRequest::with_uri(path)
        .method(Method::PUT)
        .set_json(data)
}

pub fn delete_req(path: &str) -> TestRequest {
    TestRequest::with_uri(path).method(Method::DELETE)
}

pub fn bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {}", token)))
}

/// run the request, expect a json body
pub async fn call<S, B>(req: TestRequest, app: &S) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    Ok((read_body_json::<Value, _>(res).await, status))
}

/// run the request, return status, content type and the raw body
pub async fn call_raw<S, B>(req: TestRequest, app: &S) -> Result<(u16, String, Vec<u8>)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body = read_body(res).await.to_vec();
    Ok((status, content_type, body))
}

pub async fn get<S, B>(app: &S, path: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(get_req(path), app).await
}

pub async fn post<S, B>(app: &S, path: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(post_req(path, data), app).await
}

pub async fn auth_get<S, B>(app: &S, path: &str, token: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(bearer(get_req(path), token), app).await
}

pub async fn auth_post<S, B>(app: &S, path: &str, token: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(bearer(post_req(path, data), token), app).await
}

pub async fn auth_put<S, B>(app: &S, path: &str, token: &str, data: Value) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(bearer(put_req(path, data), token), app).await
}

pub async fn auth_delete<S, B>(app: &S, path: &str, token: &str) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    call(bearer(delete_req(path), token), app).await
}
