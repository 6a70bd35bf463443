//! http api

use crate::{
    auth::{self, AuthError},
    report,
    service::{
        AnnouncementForm, CollectionForm, DonationForm, ExpenseForm, MemberForm, ScheduleForm,
    },
    setting::Setting,
    summary, upi, AppState, Error, Result,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder, Scope};
use serde::Deserialize;
use serde_json::{json, Value};
pub const CARGO_PKG_VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

fn version() -> String {
    CARGO_PKG_VERSION.map(ToOwned::to_owned).unwrap_or_default()
}

pub fn scope() -> Scope {
    web::scope("/v1")
        .service(info)
        .service(register)
        .service(login)
        .service(refresh)
        .service(my)
        .service(list_members)
        .service(create_member)
        .service(update_member)
        .service(list_donations)
        .service(create_donation)
        .service(donation_qr)
        .service(list_collections)
        .service(create_collection)
        .service(list_expenses)
        .service(create_expense)
        .service(list_schedules)
        .service(create_schedule)
        .service(update_schedule)
        .service(delete_schedule)
        .service(list_announcements)
        .service(create_announcement)
        .service(update_announcement)
        .service(summary_report)
        .service(export_report)
        .service(list_activities)
        .service(list_stats)
        .service(list_admins)
        .service(approve_admin)
        .service(reject_admin)
        .service(delete_admin)
}

#[get("/info")]
pub async fn info(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(json!({
        "version": version(),
        "event": {
            "name": state.setting.event.name,
            "organizer": state.setting.event.organizer,
        },
        "upi": {
            "enabled": state.setting.upi.configured(),
        },
        "announcement": {
            "rotate_secs": state.setting.announcement.rotate_secs,
        },
    })))
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterReq {
    name: String,
    email: String,
    password: String,
}

/// new accounts start pending and wait for an approval seat
#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    data: web::Json<RegisterReq>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();
    if data.name.trim().is_empty() {
        return Err(Error::Validation("name is required".to_owned()));
    }
    if !data.email.trim().contains('@') {
        return Err(Error::Validation("a valid email is required".to_owned()));
    }
    if data.password.len() < 8 {
        return Err(Error::Validation(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let hash = auth::hash_password(&data.password)?;
    let admin = state
        .service
        .create_admin(data.name.trim(), data.email.trim(), hash)
        .await?;
    Ok(web::Json(json!({ "admin": admin })))
}

fn token_pair(admin_id: i32, setting: &Setting) -> Result<Value> {
    let secret = setting.auth.secret.as_bytes();
    let access_token =
        auth::JwtToken::generate(admin_id, setting.auth.access_token_expiry, false, secret)?;
    let refresh_token =
        auth::JwtToken::generate(admin_id, setting.auth.refresh_token_expiry, true, secret)?;
    Ok(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReq {
    email: String,
    password: String,
}

#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginReq>,
) -> Result<impl Responder, Error> {
    let data = data.into_inner();
    let admin = state
        .service
        .get_admin_by_email(data.email.trim())
        .await?
        .ok_or(Error::Unauthorized)?;
    if !auth::verify_password(&data.password, &admin.password) {
        return Err(Error::Unauthorized);
    }

    let tokens = token_pair(admin.id, &state.setting)?;
    Ok(web::Json(json!({ "admin": admin, "auth": tokens })))
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshReq {
    refresh_token: String,
}

#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<AppState>,
    data: web::Json<RefreshReq>,
) -> Result<impl Responder, Error> {
    let token =
        auth::JwtToken::from_str(&data.refresh_token, state.setting.auth.secret.as_bytes())?;
    if !token.refresh {
        return Err(AuthError::Invalid("not a refresh token").into());
    }
    // the account must still exist
    let admin = match state.service.get_admin_by_id(token.admin_id).await {
        Ok(admin) => admin,
        Err(Error::NotFound(_)) => return Err(Error::Unauthorized),
        Err(e) => return Err(e),
    };

    let tokens = token_pair(admin.id, &state.setting)?;
    Ok(web::Json(json!({ "auth": tokens })))
}

/// current account info with running totals
#[get("/my")]
pub async fn my(
    state: web::Data<AppState>,
    admin: auth::AuthedAdmin,
) -> Result<impl Responder, Error> {
    let stat = state.service.get_stat(admin.admin.id).await?;
    Ok(web::Json(json!({ "admin": admin.admin, "stat": stat })))
}

#[get("/members")]
pub async fn list_members(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "members": state.service.list_members().await? }),
    ))
}

#[post("/members")]
pub async fn create_member(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<MemberForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let member = state.service.create_member(&admin.admin, form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "member_payment_recorded",
        &format!(
            "{} paid ₹{} via {}",
            member.name, member.amount_paid, member.payment_method
        ),
    );
    Ok(web::Json(json!({ "member": member })))
}

#[put("/members/{id}")]
pub async fn update_member(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    id: web::Path<i32>,
    data: web::Json<MemberForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let member = state.service.update_member(id.into_inner(), form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "member_payment_updated",
        &format!("{} now at ₹{}", member.name, member.amount_paid),
    );
    Ok(web::Json(json!({ "member": member })))
}

#[get("/donations")]
pub async fn list_donations(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "donations": state.service.list_donations().await? }),
    ))
}

#[post("/donations")]
pub async fn create_donation(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<DonationForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let donation = state.service.create_donation(&admin.admin, form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "donation_recorded",
        &format!(
            "₹{} from {} via {}",
            donation.amount, donation.person_name, donation.payment_method
        ),
    );
    Ok(web::Json(json!({ "donation": donation })))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QrQuery {
    amount: String,
    method: Option<String>,
    note: Option<String>,
}

/// payment qr for the donation form. replies 204 when the input is
/// not eligible so the page clears the image without an error
#[get("/donations/qr")]
pub async fn donation_qr(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
    query: web::Query<QrQuery>,
) -> Result<HttpResponse, Error> {
    if !state.setting.upi.configured() {
        return Err(Error::Validation("upi payee is not configured".to_owned()));
    }
    let method = query.method.as_deref().unwrap_or(upi::METHOD_DIGITAL);
    let amount = match upi::eligible_amount(&query.amount) {
        Some(amount) if method == upi::METHOD_DIGITAL => amount,
        _ => return Ok(HttpResponse::NoContent().finish()),
    };

    let intent = upi::UpiIntent {
        vpa: state.setting.upi.vpa.clone(),
        payee_name: state.setting.upi.payee_name.clone(),
        amount,
        note: query
            .note
            .clone()
            .unwrap_or_else(|| format!("Donation to {}", state.setting.upi.payee_name)),
    };
    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(intent.qr_svg()?))
}

#[get("/collections")]
pub async fn list_collections(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "collections": state.service.list_collections().await? }),
    ))
}

#[post("/collections")]
pub async fn create_collection(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<CollectionForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let collection = state.service.create_collection(&admin.admin, form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "collection_recorded",
        &format!(
            "₹{} collected on {}",
            collection.amount,
            summary::display_naive_date(collection.date)
        ),
    );
    Ok(web::Json(json!({ "collection": collection })))
}

#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "expenses": state.service.list_expenses().await? }),
    ))
}

#[post("/expenses")]
pub async fn create_expense(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<ExpenseForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let expense = state.service.create_expense(&admin.admin, form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "expense_recorded",
        &format!("₹{} on {}", expense.amount, expense.purpose),
    );
    Ok(web::Json(json!({ "expense": expense })))
}

#[get("/schedules")]
pub async fn list_schedules(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "schedules": state.service.list_schedules().await? }),
    ))
}

#[post("/schedules")]
pub async fn create_schedule(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<ScheduleForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let schedule = state.service.create_schedule(&admin.admin, form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "schedule_created",
        &format!(
            "{} on {}",
            schedule.title,
            summary::display_naive_date(schedule.date)
        ),
    );
    Ok(web::Json(json!({ "schedule": schedule })))
}

#[put("/schedules/{id}")]
pub async fn update_schedule(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    id: web::Path<i32>,
    data: web::Json<ScheduleForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let schedule = state.service.update_schedule(id.into_inner(), form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "schedule_updated",
        &schedule.title,
    );
    Ok(web::Json(json!({ "schedule": schedule })))
}

#[delete("/schedules/{id}")]
pub async fn delete_schedule(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    id: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let id = id.into_inner();
    state.service.delete_schedule(id).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "schedule_deleted",
        &format!("schedule #{}", id),
    );
    Ok(web::Json(json!({ "success": true })))
}

#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "announcements": state.service.list_announcements().await? }),
    ))
}

#[post("/announcements")]
pub async fn create_announcement(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    data: web::Json<AnnouncementForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let announcement = state.service.create_announcement(form).await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "announcement_posted",
        &announcement.title,
    );
    Ok(web::Json(json!({ "announcement": announcement })))
}

#[put("/announcements/{id}")]
pub async fn update_announcement(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
    id: web::Path<i32>,
    data: web::Json<AnnouncementForm>,
) -> Result<impl Responder, Error> {
    let form = data.into_inner();
    form.validate()?;
    let announcement = state
        .service
        .update_announcement(id.into_inner(), form)
        .await?;
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "announcement_updated",
        &announcement.title,
    );
    Ok(web::Json(json!({ "announcement": announcement })))
}

/// totals, method split and per-admin breakdown in one reply
#[get("/summary")]
pub async fn summary_report(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    let members = state.service.list_members().await?;
    let donations = state.service.list_donations().await?;
    let collections = state.service.list_collections().await?;
    let expenses = state.service.list_expenses().await?;
    Ok(web::Json(summary::summarize(
        &members,
        &donations,
        &collections,
        &expenses,
    )))
}

#[get("/report/export")]
pub async fn export_report(
    state: web::Data<AppState>,
    admin: auth::ApprovedAdmin,
) -> Result<HttpResponse, Error> {
    let members = state.service.list_members().await?;
    let donations = state.service.list_donations().await?;
    let collections = state.service.list_collections().await?;
    let expenses = state.service.list_expenses().await?;

    let rows = report::report_rows(&members, &donations, &collections, &expenses);
    let csv = report::to_csv(&rows);
    let filename = report::filename(&state.setting.event.name, summary::today());
    state.activity.append(
        admin.admin.id,
        &admin.admin.name,
        "report_exported",
        &format!("{} rows to {}", rows.len(), filename),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv))
}

/// recent admin actions, newest first
#[get("/activities")]
pub async fn list_activities(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(json!({ "activities": state.activity.list() })))
}

#[get("/stats")]
pub async fn list_stats(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "stats": state.service.list_stats().await? }),
    ))
}

#[get("/admins")]
pub async fn list_admins(
    state: web::Data<AppState>,
    _admin: auth::ApprovedAdmin,
) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "admins": state.service.list_admins().await? }),
    ))
}

#[post("/admins/{id}/approve")]
pub async fn approve_admin(
    state: web::Data<AppState>,
    approver: auth::ApprovedAdmin,
    id: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let admin = state
        .service
        .approve_admin(id.into_inner(), state.setting.admin.max_approved)
        .await?;
    state.activity.append(
        approver.admin.id,
        &approver.admin.name,
        "admin_approved",
        &format!("{} ({})", admin.name, admin.email),
    );
    Ok(web::Json(json!({ "admin": admin })))
}

#[post("/admins/{id}/reject")]
pub async fn reject_admin(
    state: web::Data<AppState>,
    approver: auth::ApprovedAdmin,
    id: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let admin = state.service.reject_admin(id.into_inner()).await?;
    state.activity.append(
        approver.admin.id,
        &approver.admin.name,
        "admin_rejected",
        &format!("{} ({})", admin.name, admin.email),
    );
    Ok(web::Json(json!({ "admin": admin })))
}

#[delete("/admins/{id}")]
pub async fn delete_admin(
    state: web::Data<AppState>,
    approver: auth::ApprovedAdmin,
    id: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let id = id.into_inner();
    state.service.delete_admin(id).await?;
    state.activity.append(
        approver.admin.id,
        &approver.admin.name,
        "admin_deleted",
        &format!("admin #{}", id),
    );
    Ok(web::Json(json!({ "success": true })))
}
