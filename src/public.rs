//! public read-only api for the festival site

use crate::{now, summary, AppState, Error};
use actix_web::{get, web, Responder};
use entity::member;
use serde::Serialize;
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(info)
        .service(members)
        .service(schedules)
        .service(announcements);
}

/// member row with the phone number stripped
#[derive(Debug, Clone, Serialize)]
pub struct PublicMember {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub amount_paid: f64,
    pub payment_method: String,
    pub priority_order: i32,
    pub created_at: i64,
}

impl From<member::Model> for PublicMember {
    fn from(value: member::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            address: value.address,
            amount_paid: value.amount_paid,
            payment_method: value.payment_method,
            priority_order: value.priority_order,
            created_at: value.created_at,
        }
    }
}

#[get("/info")]
pub async fn info(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(json!({
        "event": {
            "name": state.setting.event.name,
            "organizer": state.setting.event.organizer,
        },
        "upi": {
            "enabled": state.setting.upi.configured(),
            "vpa": state.setting.upi.vpa,
            "payee_name": state.setting.upi.payee_name,
        },
        "announcement": {
            "rotate_secs": state.setting.announcement.rotate_secs,
        },
    })))
}

#[get("/members")]
pub async fn members(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    let list = state
        .service
        .list_members()
        .await?
        .into_iter()
        .map(PublicMember::from)
        .collect::<Vec<_>>();
    Ok(web::Json(json!({ "members": list })))
}

#[get("/schedules")]
pub async fn schedules(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    Ok(web::Json(
        json!({ "schedules": state.service.list_active_schedules().await? }),
    ))
}

/// active announcements plus the slot the site should show right now
#[get("/announcements")]
pub async fn announcements(state: web::Data<AppState>) -> Result<impl Responder, Error> {
    let list = state.service.list_active_announcements().await?;
    let current = summary::rotation_slot(
        list.len(),
        now(),
        state.setting.announcement.rotate_secs,
    );
    Ok(web::Json(json!({
        "announcements": list,
        "current": current,
    })))
}
