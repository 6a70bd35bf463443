use crate::{now, Error, Result};
use chrono::NaiveDate;
use entity::{admin, announcement, collection, donation, expense, member, schedule, stat};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

fn default_priority() -> i32 {
    3
}

fn default_true() -> bool {
    true
}

fn non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn non_negative(amount: f64, field: &'static str) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(format!("{} must be zero or more", field)));
    }
    Ok(())
}

fn positive(amount: f64, field: &'static str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation(format!("{} must be more than zero", field)));
    }
    Ok(())
}

fn priority_in_range(priority: i32) -> Result<()> {
    if !(1..=5).contains(&priority) {
        return Err(Error::Validation(
            "priority must be between 1 and 5".to_owned(),
        ));
    }
    Ok(())
}

/// amounts arrive as strings from the forms, numbers stay accepted
#[derive(Debug, Clone, Deserialize)]
pub struct MemberForm {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub amount_paid: f64,
    pub payment_method: String,
    #[serde(default)]
    pub priority_order: i32,
}

impl MemberForm {
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.name, "name")?;
        non_empty(&self.payment_method, "payment method")?;
        non_negative(self.amount_paid, "amount")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DonationForm {
    pub person_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub amount: f64,
    pub payment_method: String,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_phone: Option<String>,
    #[serde(default)]
    pub items_donated: Option<String>,
}

impl DonationForm {
    /// zero is allowed, purely in-kind donations carry no amount
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.person_name, "person name")?;
        non_empty(&self.payment_method, "payment method")?;
        non_negative(self.amount, "amount")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionForm {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub amount: f64,
    pub date: NaiveDate,
}

impl CollectionForm {
    pub fn validate(&self) -> Result<()> {
        positive(self.amount, "amount")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseForm {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub amount: f64,
    pub purpose: String,
    pub date: NaiveDate,
}

impl ExpenseForm {
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.purpose, "purpose")?;
        positive(self.amount, "amount")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleForm {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ScheduleForm {
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.title, "title")?;
        priority_in_range(self.priority)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AnnouncementForm {
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.title, "title")?;
        non_empty(&self.content, "content")?;
        priority_in_range(self.priority)
    }
}

/// Festival data service
pub struct Service {
    conn: DbConn,
}

impl Service {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    // admins

    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
    ) -> Result<admin::Model> {
        if self.get_admin_by_email(email).await?.is_some() {
            return Err(Error::Validation("email is already registered".to_owned()));
        }
        let time = now() as i64;
        Ok(admin::ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            password: Set(password_hash),
            role: Set(admin::Role::Admin),
            status: Set(admin::Status::Pending),
            created_at: Set(time),
            updated_at: Set(time),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<admin::Model>> {
        Ok(admin::Entity::find()
            .filter(admin::Column::Email.eq(email))
            .one(self.db())
            .await?)
    }

    pub async fn get_admin_by_id(&self, id: i32) -> Result<admin::Model> {
        admin::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("admin"))
    }

    pub async fn list_admins(&self) -> Result<Vec<admin::Model>> {
        Ok(admin::Entity::find()
            .order_by_asc(admin::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    /// flip a pending account to approved, refusing once `max_approved`
    /// seats are taken
    pub async fn approve_admin(&self, id: i32, max_approved: u64) -> Result<admin::Model> {
        let txn = self.conn.begin().await?;
        let approved = admin::Entity::find()
            .filter(admin::Column::Status.eq(admin::Status::Approved))
            .count(&txn)
            .await?;
        if approved >= max_approved {
            return Err(Error::Validation(format!(
                "approved admin limit reached ({})",
                max_approved
            )));
        }

        let res = admin::Entity::update_many()
            .set(admin::ActiveModel {
                status: Set(admin::Status::Approved),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::Status.eq(admin::Status::Pending))
            .exec(&txn)
            .await?;
        if res.rows_affected != 1 {
            return Err(Error::Validation(
                "only pending accounts can be approved".to_owned(),
            ));
        }
        txn.commit().await?;

        self.get_admin_by_id(id).await
    }

    pub async fn reject_admin(&self, id: i32) -> Result<admin::Model> {
        let res = admin::Entity::update_many()
            .set(admin::ActiveModel {
                status: Set(admin::Status::Rejected),
                updated_at: Set(now() as i64),
                ..Default::default()
            })
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::Status.ne(admin::Status::Rejected))
            .exec(self.db())
            .await?;
        if res.rows_affected != 1 {
            return Err(Error::Validation(
                "account is missing or already rejected".to_owned(),
            ));
        }
        self.get_admin_by_id(id).await
    }

    /// accounts must be rejected before they can be removed
    pub async fn delete_admin(&self, id: i32) -> Result<()> {
        let res = admin::Entity::delete_many()
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::Status.eq(admin::Status::Rejected))
            .exec(self.db())
            .await?;
        if res.rows_affected != 1 {
            return Err(Error::Validation(
                "only rejected accounts can be deleted".to_owned(),
            ));
        }
        Ok(())
    }

    // members

    pub async fn create_member(
        &self,
        admin: &admin::Model,
        form: MemberForm,
    ) -> Result<member::Model> {
        Ok(member::ActiveModel {
            id: NotSet,
            name: Set(form.name),
            address: Set(form.address),
            phone: Set(form.phone),
            amount_paid: Set(form.amount_paid),
            payment_method: Set(form.payment_method),
            admin_id: Set(admin.id),
            admin_name: Set(admin.name.clone()),
            priority_order: Set(form.priority_order),
            created_at: Set(now() as i64),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn get_member(&self, id: i32) -> Result<member::Model> {
        member::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("member"))
    }

    /// whole-field overwrite of the form fields, the recording admin
    /// columns stay with the original creator
    pub async fn update_member(&self, id: i32, form: MemberForm) -> Result<member::Model> {
        self.get_member(id).await?;
        Ok(member::ActiveModel {
            id: Set(id),
            name: Set(form.name),
            address: Set(form.address),
            phone: Set(form.phone),
            amount_paid: Set(form.amount_paid),
            payment_method: Set(form.payment_method),
            priority_order: Set(form.priority_order),
            ..Default::default()
        }
        .update(self.db())
        .await?)
    }

    pub async fn list_members(&self) -> Result<Vec<member::Model>> {
        Ok(member::Entity::find()
            .order_by_asc(member::Column::PriorityOrder)
            .order_by_desc(member::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    // donations

    pub async fn create_donation(
        &self,
        admin: &admin::Model,
        form: DonationForm,
    ) -> Result<donation::Model> {
        Ok(donation::ActiveModel {
            id: NotSet,
            person_name: Set(form.person_name),
            amount: Set(form.amount),
            payment_method: Set(form.payment_method),
            admin_id: Set(admin.id),
            admin_name: Set(admin.name.clone()),
            donor_name: Set(form.donor_name),
            donor_phone: Set(form.donor_phone),
            items_donated: Set(form.items_donated),
            created_at: Set(now() as i64),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn list_donations(&self) -> Result<Vec<donation::Model>> {
        Ok(donation::Entity::find()
            .order_by_desc(donation::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    // collections

    /// the stat row moves in the same transaction as the record
    pub async fn create_collection(
        &self,
        admin: &admin::Model,
        form: CollectionForm,
    ) -> Result<collection::Model> {
        let txn = self.conn.begin().await?;
        let model = collection::ActiveModel {
            id: NotSet,
            admin_id: Set(Some(admin.id)),
            admin_name: Set(admin.name.clone()),
            amount: Set(form.amount),
            date: Set(form.date),
            created_at: Set(now() as i64),
        }
        .insert(&txn)
        .await?;
        bump_collected(&txn, admin, form.amount).await?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn list_collections(&self) -> Result<Vec<collection::Model>> {
        Ok(collection::Entity::find()
            .order_by_desc(collection::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    // expenses

    pub async fn create_expense(
        &self,
        admin: &admin::Model,
        form: ExpenseForm,
    ) -> Result<expense::Model> {
        let txn = self.conn.begin().await?;
        let model = expense::ActiveModel {
            id: NotSet,
            admin_id: Set(Some(admin.id)),
            admin_name: Set(admin.name.clone()),
            amount: Set(form.amount),
            purpose: Set(form.purpose),
            date: Set(form.date),
            created_at: Set(now() as i64),
        }
        .insert(&txn)
        .await?;
        bump_expense(&txn, admin, form.amount).await?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn list_expenses(&self) -> Result<Vec<expense::Model>> {
        Ok(expense::Entity::find()
            .order_by_desc(expense::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    // schedules

    pub async fn create_schedule(
        &self,
        admin: &admin::Model,
        form: ScheduleForm,
    ) -> Result<schedule::Model> {
        Ok(schedule::ActiveModel {
            id: NotSet,
            date: Set(form.date),
            title: Set(form.title),
            description: Set(form.description),
            time_start: Set(form.time_start),
            time_end: Set(form.time_end),
            location: Set(form.location),
            organizer: Set(form.organizer),
            priority: Set(form.priority),
            is_active: Set(form.is_active),
            created_by: Set(admin.id),
            created_at: Set(now() as i64),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn update_schedule(&self, id: i32, form: ScheduleForm) -> Result<schedule::Model> {
        schedule::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("schedule"))?;
        Ok(schedule::ActiveModel {
            id: Set(id),
            date: Set(form.date),
            title: Set(form.title),
            description: Set(form.description),
            time_start: Set(form.time_start),
            time_end: Set(form.time_end),
            location: Set(form.location),
            organizer: Set(form.organizer),
            priority: Set(form.priority),
            is_active: Set(form.is_active),
            ..Default::default()
        }
        .update(self.db())
        .await?)
    }

    pub async fn delete_schedule(&self, id: i32) -> Result<()> {
        let res = schedule::Entity::delete_by_id(id).exec(self.db()).await?;
        if res.rows_affected != 1 {
            return Err(Error::NotFound("schedule"));
        }
        Ok(())
    }

    pub async fn list_schedules(&self) -> Result<Vec<schedule::Model>> {
        Ok(schedule::Entity::find()
            .order_by_asc(schedule::Column::Date)
            .order_by_asc(schedule::Column::Priority)
            .all(self.db())
            .await?)
    }

    pub async fn list_active_schedules(&self) -> Result<Vec<schedule::Model>> {
        Ok(schedule::Entity::find()
            .filter(schedule::Column::IsActive.eq(true))
            .order_by_asc(schedule::Column::Date)
            .order_by_asc(schedule::Column::Priority)
            .all(self.db())
            .await?)
    }

    // announcements

    pub async fn create_announcement(&self, form: AnnouncementForm) -> Result<announcement::Model> {
        Ok(announcement::ActiveModel {
            id: NotSet,
            title: Set(form.title),
            content: Set(form.content),
            priority: Set(form.priority),
            is_active: Set(form.is_active),
            created_at: Set(now() as i64),
        }
        .insert(self.db())
        .await?)
    }

    pub async fn update_announcement(
        &self,
        id: i32,
        form: AnnouncementForm,
    ) -> Result<announcement::Model> {
        announcement::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or(Error::NotFound("announcement"))?;
        Ok(announcement::ActiveModel {
            id: Set(id),
            title: Set(form.title),
            content: Set(form.content),
            priority: Set(form.priority),
            is_active: Set(form.is_active),
            ..Default::default()
        }
        .update(self.db())
        .await?)
    }

    pub async fn list_announcements(&self) -> Result<Vec<announcement::Model>> {
        Ok(announcement::Entity::find()
            .order_by_asc(announcement::Column::Priority)
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    pub async fn list_active_announcements(&self) -> Result<Vec<announcement::Model>> {
        Ok(announcement::Entity::find()
            .filter(announcement::Column::IsActive.eq(true))
            .order_by_asc(announcement::Column::Priority)
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db())
            .await?)
    }

    // stats

    pub async fn get_stat(&self, admin_id: i32) -> Result<Option<stat::Model>> {
        Ok(stat::Entity::find()
            .filter(stat::Column::AdminId.eq(admin_id))
            .one(self.db())
            .await?)
    }

    pub async fn list_stats(&self) -> Result<Vec<stat::Model>> {
        Ok(stat::Entity::find()
            .order_by_desc(stat::Column::CollectedTotal)
            .all(self.db())
            .await?)
    }
}

async fn bump_collected(
    txn: &DatabaseTransaction,
    admin: &admin::Model,
    amount: f64,
) -> Result<()> {
    let res = stat::Entity::update_many()
        .col_expr(
            stat::Column::CollectedTotal,
            Expr::col(stat::Column::CollectedTotal).add(amount),
        )
        .col_expr(
            stat::Column::CollectedCount,
            Expr::col(stat::Column::CollectedCount).add(1),
        )
        .col_expr(stat::Column::UpdatedAt, Expr::value(now() as i64))
        .filter(stat::Column::AdminId.eq(admin.id))
        .exec(txn)
        .await?;
    if res.rows_affected == 0 {
        stat::ActiveModel {
            admin_id: Set(admin.id),
            admin_name: Set(admin.name.clone()),
            collected_total: Set(amount),
            collected_count: Set(1),
            updated_at: Set(now() as i64),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn bump_expense(txn: &DatabaseTransaction, admin: &admin::Model, amount: f64) -> Result<()> {
    let res = stat::Entity::update_many()
        .col_expr(
            stat::Column::ExpenseTotal,
            Expr::col(stat::Column::ExpenseTotal).add(amount),
        )
        .col_expr(
            stat::Column::ExpenseCount,
            Expr::col(stat::Column::ExpenseCount).add(1),
        )
        .col_expr(stat::Column::UpdatedAt, Expr::value(now() as i64))
        .filter(stat::Column::AdminId.eq(admin.id))
        .exec(txn)
        .await?;
    if res.rows_affected == 0 {
        stat::ActiveModel {
            admin_id: Set(admin.id),
            admin_name: Set(admin.name.clone()),
            expense_total: Set(amount),
            expense_count: Set(1),
            updated_at: Set(now() as i64),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}
