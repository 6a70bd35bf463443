use actix_http::Request;
use actix_rt::time::sleep;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test::{call_service, init_service, read_body},
    web,
};
use anyhow::Result;
use chandabox::{auth, create_web_app, AppState};
use serde_json::json;
use std::time::Duration;
use util::create_test_state;

mod util;

pub async fn create_approved_app() -> Result<(
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    web::Data<AppState>,
    String,
)> {
    let state = web::Data::new(create_test_state().await?);
    let app = init_service(create_web_app(state.clone())).await;
    sleep(Duration::from_millis(50)).await;

    let hash = auth::hash_password("festival pass")?;
    let admin = state
        .service
        .create_admin("Asha Kulkarni", "asha@example.org", hash)
        .await?;
    state
        .service
        .approve_admin(admin.id, state.setting.admin.max_approved)
        .await?;

    let (val, status) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 200);
    let token = val["auth"]["access_token"].as_str().unwrap().to_owned();
    Ok((app, state, token))
}

#[actix_rt::test]
async fn info() -> Result<()> {
    let state = web::Data::new(create_test_state().await?);
    let app = init_service(create_web_app(state)).await;
    sleep(Duration::from_millis(50)).await;

    let (val, status) = util::get(&app, "/v1/info").await?;
    assert_eq!(status, 200);
    assert!(val["version"].is_string());
    assert_eq!(val["event"]["name"], json!("Ganesh Chaturthi"));
    assert_eq!(val["upi"]["enabled"], json!(true));
    Ok(())
}

#[actix_rt::test]
async fn register_login_and_approval_gate() -> Result<()> {
    let state = web::Data::new(create_test_state().await?);
    let app = init_service(create_web_app(state.clone())).await;
    sleep(Duration::from_millis(50)).await;

    // weak password
    let (val, status) = util::post(
        &app,
        "/v1/auth/register",
        json!({ "name": "Asha", "email": "asha@example.org", "password": "short" }),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], json!(true));

    // bad email
    let (_val, status) = util::post(
        &app,
        "/v1/auth/register",
        json!({ "name": "Asha", "email": "not-an-email", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 400);

    let (val, status) = util::post(
        &app,
        "/v1/auth/register",
        json!({ "name": "Asha", "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["admin"]["status"], json!("pending"));
    // the hash never leaves the server
    assert!(val["admin"]["password"].is_null());

    // same email again
    let (val, status) = util::post(
        &app,
        "/v1/auth/register",
        json!({ "name": "Asha", "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 400);
    assert!(val["message"]
        .as_str()
        .unwrap_or_default()
        .contains("registered"));

    let (val, status) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 200);
    let token = val["auth"]["access_token"].as_str().unwrap().to_owned();
    let admin_id = val["admin"]["id"].as_i64().unwrap() as i32;

    // pending accounts can see their own profile
    let (val, status) = util::auth_get(&app, "/v1/my", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["admin"]["email"], json!("asha@example.org"));
    assert!(val["stat"].is_null());

    // but not the records
    let (val, status) = util::auth_get(&app, "/v1/members", &token).await?;
    assert_eq!(status, 401);
    assert!(val["message"]
        .as_str()
        .unwrap_or_default()
        .contains("pending"));

    state
        .service
        .approve_admin(admin_id, state.setting.admin.max_approved)
        .await?;

    let (val, status) = util::auth_get(&app, "/v1/members", &token).await?;
    assert_eq!(status, 200);
    assert!(val["members"].as_array().unwrap().is_empty());

    // wrong password
    let (_val, status) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "asha@example.org", "password": "wrong" }),
    )
    .await?;
    assert_eq!(status, 401);

    // unknown account
    let (_val, status) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "nobody@example.org", "password": "festival pass" }),
    )
    .await?;
    assert_eq!(status, 401);
    Ok(())
}

#[actix_rt::test]
async fn refresh_tokens() -> Result<()> {
    let (app, _state, _token) = create_approved_app().await?;

    let (val, _) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    let access_token = val["auth"]["access_token"].as_str().unwrap().to_owned();
    let refresh_token = val["auth"]["refresh_token"].as_str().unwrap().to_owned();

    // a refresh token opens no doors by itself
    let (_val, status) = util::auth_get(&app, "/v1/my", &refresh_token).await?;
    assert_eq!(status, 401);

    // and an access token cannot refresh
    let (_val, status) = util::post(
        &app,
        "/v1/auth/refresh",
        json!({ "refresh_token": access_token }),
    )
    .await?;
    assert_eq!(status, 401);

    let (val, status) = util::post(
        &app,
        "/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await?;
    assert_eq!(status, 200);
    let fresh = val["auth"]["access_token"].as_str().unwrap().to_owned();

    let (_val, status) = util::auth_get(&app, "/v1/my", &fresh).await?;
    assert_eq!(status, 200);

    let (_val, status) = util::post(
        &app,
        "/v1/auth/refresh",
        json!({ "refresh_token": "garbage" }),
    )
    .await?;
    assert_eq!(status, 401);
    Ok(())
}

#[actix_rt::test]
async fn record_and_summarize() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    // string amount, the forms send text
    let (val, status) = util::auth_post(
        &app,
        "/v1/members",
        &token,
        json!({
            "name": "Ramesh Patil",
            "address": "12 MG Road",
            "phone": "9800000000",
            "amount_paid": "1000",
            "payment_method": "handcash",
            "priority_order": 1
        }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["member"]["amount_paid"], json!(1000.0));
    assert_eq!(val["member"]["admin_name"], json!("Asha Kulkarni"));
    let member_id = val["member"]["id"].as_i64().unwrap();

    let (val, status) = util::auth_post(
        &app,
        "/v1/donations",
        &token,
        json!({
            "person_name": "Meera Joshi",
            "amount": 300,
            "payment_method": "phonepay",
            "donor_name": "",
            "items_donated": "10kg ladoo"
        }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["donation"]["amount"], json!(300.0));

    let (_val, status) = util::auth_post(
        &app,
        "/v1/collections",
        &token,
        json!({ "amount": "200", "date": "2025-06-15" }),
    )
    .await?;
    assert_eq!(status, 200);

    let (_val, status) = util::auth_post(
        &app,
        "/v1/expenses",
        &token,
        json!({ "amount": 150, "purpose": "mandap poles", "date": "2025-06-16" }),
    )
    .await?;
    assert_eq!(status, 200);

    // invalid records never land
    let (_val, status) = util::auth_post(
        &app,
        "/v1/members",
        &token,
        json!({ "name": "", "amount_paid": 10, "payment_method": "handcash" }),
    )
    .await?;
    assert_eq!(status, 400);
    let (_val, status) = util::auth_post(
        &app,
        "/v1/collections",
        &token,
        json!({ "amount": 0, "date": "2025-06-15" }),
    )
    .await?;
    assert_eq!(status, 400);

    let (val, status) = util::auth_get(&app, "/v1/summary", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["total_collected"], json!(1500.0));
    assert_eq!(val["total_spent"], json!(150.0));
    assert_eq!(val["available_amount"], json!(1350.0));
    assert_eq!(val["label"], json!("Profit"));
    assert_eq!(val["methods"]["handcash"], json!(1000.0));
    assert_eq!(val["methods"]["phonepay"], json!(300.0));
    assert_eq!(val["by_admin"][0]["name"], json!("Asha Kulkarni"));
    assert_eq!(val["by_admin"][0]["collected"], json!(200.0));
    assert_eq!(val["by_admin"][0]["expenses"], json!(150.0));
    assert_eq!(val["by_date"].as_array().unwrap().len(), 1);

    // whole-record update
    let (val, status) = util::auth_put(
        &app,
        &format!("/v1/members/{}", member_id),
        &token,
        json!({
            "name": "Ramesh Patil",
            "address": "12 MG Road",
            "phone": "9800000000",
            "amount_paid": "1200",
            "payment_method": "phonepay",
            "priority_order": 1
        }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["member"]["amount_paid"], json!(1200.0));

    let (val, _) = util::auth_get(&app, "/v1/summary", &token).await?;
    assert_eq!(val["total_collected"], json!(1700.0));
    assert_eq!(val["methods"]["handcash"], json!(0.0));

    let (val, status) = util::auth_get(&app, "/v1/stats", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["stats"][0]["collected_total"], json!(200.0));
    assert_eq!(val["stats"][0]["expense_total"], json!(150.0));
    Ok(())
}

#[actix_rt::test]
async fn donation_qr() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    let (status, content_type, body) = util::call_raw(
        util::bearer(util::get_req("/v1/donations/qr?amount=250"), &token),
        &app,
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(content_type, "image/svg+xml");
    assert!(String::from_utf8(body)?.contains("<svg"));

    // the qr is part of the recording flow, not the public site
    let (status, _, _) =
        util::call_raw(util::get_req("/v1/donations/qr?amount=250"), &app).await?;
    assert_eq!(status, 401);

    // ineligible input clears the image without an error
    let (status, _, body) = util::call_raw(
        util::bearer(util::get_req("/v1/donations/qr?amount=0"), &token),
        &app,
    )
    .await?;
    assert_eq!(status, 204);
    assert!(body.is_empty());

    let (status, _, _) = util::call_raw(
        util::bearer(util::get_req("/v1/donations/qr?amount=abc"), &token),
        &app,
    )
    .await?;
    assert_eq!(status, 204);

    let (status, _, _) = util::call_raw(
        util::bearer(util::get_req("/v1/donations/qr?amount=250&method=cash"), &token),
        &app,
    )
    .await?;
    assert_eq!(status, 204);
    Ok(())
}

#[actix_rt::test]
async fn qr_requires_a_payee() -> Result<()> {
    let mut state = create_test_state().await?;
    state.setting.upi = Default::default();
    let state = web::Data::new(state);
    let app = init_service(create_web_app(state.clone())).await;
    sleep(Duration::from_millis(50)).await;

    let hash = auth::hash_password("festival pass")?;
    let admin = state
        .service
        .create_admin("Asha", "asha@example.org", hash)
        .await?;
    state
        .service
        .approve_admin(admin.id, state.setting.admin.max_approved)
        .await?;
    let (val, _) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "asha@example.org", "password": "festival pass" }),
    )
    .await?;
    let token = val["auth"]["access_token"].as_str().unwrap().to_owned();

    let (status, _, _) = util::call_raw(
        util::bearer(util::get_req("/v1/donations/qr?amount=250"), &token),
        &app,
    )
    .await?;
    assert_eq!(status, 400);
    Ok(())
}

#[actix_rt::test]
async fn export_report() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    util::auth_post(
        &app,
        "/v1/members",
        &token,
        json!({ "name": "Ramesh Patil", "amount_paid": 500, "payment_method": "handcash" }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/donations",
        &token,
        json!({ "person_name": "Meera", "amount": 300, "payment_method": "phonepay" }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/expenses",
        &token,
        json!({ "amount": 150, "purpose": "mandap poles, \"bamboo\"", "date": "2025-06-16" }),
    )
    .await?;

    let res = call_service(
        &app,
        util::bearer(util::get_req("/v1/report/export"), &token).to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()?
        .to_owned();
    assert_eq!(content_type, "text/csv; charset=utf-8");
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()?
        .to_owned();
    assert!(disposition.starts_with("attachment; filename=\"Ganesh Chaturthi-report-"));
    assert!(disposition.ends_with(".csv\""));

    let body = String::from_utf8(read_body(res).await.to_vec())?;
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "\"Date\",\"Type\",\"Name/Purpose\",\"Amount\",\"Payment Method\",\"Admin\",\"Phone\",\"Address\""
    );
    assert_eq!(lines.count(), 3);
    assert!(body.contains("\"Member Payment\""));
    // no donor given
    assert!(body.contains("\"Anonymous\""));
    // expenses negated, quotes doubled
    assert!(body.contains("\"-150\""));
    assert!(body.contains("\"mandap poles, \"\"bamboo\"\"\""));

    // exports are for signed-in admins
    let (_val, status) = util::get(&app, "/v1/report/export").await?;
    assert_eq!(status, 401);
    Ok(())
}

#[actix_rt::test]
async fn activity_feed() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    util::auth_post(
        &app,
        "/v1/members",
        &token,
        json!({ "name": "Ramesh", "amount_paid": 500, "payment_method": "handcash" }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/expenses",
        &token,
        json!({ "amount": 150, "purpose": "decoration", "date": "2025-06-16" }),
    )
    .await?;

    let (val, status) = util::auth_get(&app, "/v1/activities", &token).await?;
    assert_eq!(status, 200);
    let activities = val["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 2);

    let actions: Vec<&str> = activities
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"member_payment_recorded"));
    assert!(actions.contains(&"expense_recorded"));

    // newest first
    let stamps: Vec<i64> = activities
        .iter()
        .map(|a| a["timestamp"].as_i64().unwrap())
        .collect();
    assert!(stamps[0] >= stamps[1]);

    assert_eq!(activities[0]["admin_name"], json!("Asha Kulkarni"));
    assert!(activities[0]["details"].as_str().unwrap().contains('₹'));
    Ok(())
}

#[actix_rt::test]
async fn admin_management() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    let (val, _) = util::post(
        &app,
        "/v1/auth/register",
        json!({ "name": "Vikram", "email": "vikram@example.org", "password": "festival pass" }),
    )
    .await?;
    let vikram = val["admin"]["id"].as_i64().unwrap();

    let (val, status) = util::auth_get(&app, "/v1/admins", &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["admins"].as_array().unwrap().len(), 2);

    let (val, status) =
        util::auth_post(&app, &format!("/v1/admins/{}/approve", vikram), &token, json!({})).await?;
    assert_eq!(status, 200);
    assert_eq!(val["admin"]["status"], json!("approved"));

    let (val, _) = util::post(
        &app,
        "/v1/auth/login",
        json!({ "email": "vikram@example.org", "password": "festival pass" }),
    )
    .await?;
    let vikram_token = val["auth"]["access_token"].as_str().unwrap().to_owned();
    let (_val, status) = util::auth_get(&app, "/v1/members", &vikram_token).await?;
    assert_eq!(status, 200);

    let (val, status) =
        util::auth_post(&app, &format!("/v1/admins/{}/reject", vikram), &token, json!({})).await?;
    assert_eq!(status, 200);
    assert_eq!(val["admin"]["status"], json!("rejected"));

    // rejection locks the account out even with a live token
    let (_val, status) = util::auth_get(&app, "/v1/members", &vikram_token).await?;
    assert_eq!(status, 401);

    let (val, status) =
        util::auth_delete(&app, &format!("/v1/admins/{}", vikram), &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["success"], json!(true));

    let (val, _) = util::auth_get(&app, "/v1/admins", &token).await?;
    assert_eq!(val["admins"].as_array().unwrap().len(), 1);

    // approving a missing account fails
    let (_val, status) =
        util::auth_post(&app, "/v1/admins/9999/approve", &token, json!({})).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[actix_rt::test]
async fn public_pages() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    util::auth_post(
        &app,
        "/v1/members",
        &token,
        json!({
            "name": "Ramesh Patil",
            "address": "12 MG Road",
            "phone": "9800000000",
            "amount_paid": 500,
            "payment_method": "handcash"
        }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/schedules",
        &token,
        json!({ "date": "2025-06-15", "title": "Sthapana" }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/schedules",
        &token,
        json!({ "date": "2025-06-16", "title": "Visarjan", "is_active": false }),
    )
    .await?;
    util::auth_post(
        &app,
        "/v1/announcements",
        &token,
        json!({ "title": "Donation drive", "content": "Counter open till 9pm" }),
    )
    .await?;

    let (val, status) = util::get(&app, "/public/info").await?;
    assert_eq!(status, 200);
    assert_eq!(val["event"]["name"], json!("Ganesh Chaturthi"));
    assert_eq!(val["upi"]["vpa"], json!("mandal@upi"));

    let (val, status) = util::get(&app, "/public/members").await?;
    assert_eq!(status, 200);
    let members = val["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], json!("Ramesh Patil"));
    // contact details stay private
    assert!(members[0]["phone"].is_null());

    let (val, status) = util::get(&app, "/public/schedules").await?;
    assert_eq!(status, 200);
    let schedules = val["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["title"], json!("Sthapana"));

    let (val, status) = util::get(&app, "/public/announcements").await?;
    assert_eq!(status, 200);
    assert_eq!(val["announcements"].as_array().unwrap().len(), 1);
    assert_eq!(val["current"], json!(0));
    Ok(())
}

#[actix_rt::test]
async fn schedule_and_announcement_updates() -> Result<()> {
    let (app, _state, token) = create_approved_app().await?;

    let (val, _) = util::auth_post(
        &app,
        "/v1/schedules",
        &token,
        json!({ "date": "2025-06-15", "title": "Aarti", "priority": 2 }),
    )
    .await?;
    let schedule_id = val["schedule"]["id"].as_i64().unwrap();

    let (val, status) = util::auth_put(
        &app,
        &format!("/v1/schedules/{}", schedule_id),
        &token,
        json!({ "date": "2025-06-15", "title": "Maha Aarti", "priority": 1 }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["schedule"]["title"], json!("Maha Aarti"));

    // out of range priority
    let (_val, status) = util::auth_post(
        &app,
        "/v1/schedules",
        &token,
        json!({ "date": "2025-06-15", "title": "Bhajan", "priority": 9 }),
    )
    .await?;
    assert_eq!(status, 400);

    let (val, status) =
        util::auth_delete(&app, &format!("/v1/schedules/{}", schedule_id), &token).await?;
    assert_eq!(status, 200);
    assert_eq!(val["success"], json!(true));
    let (_val, status) =
        util::auth_delete(&app, &format!("/v1/schedules/{}", schedule_id), &token).await?;
    assert_eq!(status, 404);

    let (val, _) = util::auth_post(
        &app,
        "/v1/announcements",
        &token,
        json!({ "title": "Route change", "content": "Via MG Road" }),
    )
    .await?;
    let announcement_id = val["announcement"]["id"].as_i64().unwrap();

    let (val, status) = util::auth_put(
        &app,
        &format!("/v1/announcements/{}", announcement_id),
        &token,
        json!({ "title": "Route change", "content": "Via Station Road", "is_active": false }),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["announcement"]["content"], json!("Via Station Road"));
    assert_eq!(val["announcement"]["is_active"], json!(false));
    Ok(())
}
