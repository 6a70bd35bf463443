use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use entity::{collection, donation, expense, member};
use serde::Serialize;
use std::collections::BTreeMap;

/// payment methods recognized by the method breakdown,
/// anything else still counts toward the grand total
pub const METHOD_HANDCASH: &str = "handcash";
pub const METHOD_PHONEPAY: &str = "phonepay";

/// display timezone, UTC+05:30
fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

/// format a unix-seconds timestamp as the public page shows dates,
/// day and month without padding
pub fn display_date(created_at: i64) -> String {
    DateTime::from_timestamp(created_at, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&ist())
        .format("%-d/%-m/%Y")
        .to_string()
}

pub fn display_naive_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// today in the display timezone
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&ist()).date_naive()
}

/// member payments + donations + manual collections
pub fn total_collected(
    members: &[member::Model],
    donations: &[donation::Model],
    collections: &[collection::Model],
) -> f64 {
    let members: f64 = members.iter().map(|m| m.amount_paid).sum();
    let donations: f64 = donations.iter().map(|d| d.amount).sum();
    let collections: f64 = collections.iter().map(|c| c.amount).sum();
    members + donations + collections
}

pub fn total_spent(expenses: &[expense::Model]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceLabel {
    Profit,
    Loss,
}

/// zero counts as a profit
pub fn balance_label(available: f64) -> BalanceLabel {
    if available >= 0.0 {
        BalanceLabel::Profit
    } else {
        BalanceLabel::Loss
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MethodTotals {
    pub handcash: f64,
    pub phonepay: f64,
}

/// method split covers member payments and donations only,
/// manual collections are mixed cash and stay out of it
pub fn by_payment_method(
    members: &[member::Model],
    donations: &[donation::Model],
) -> MethodTotals {
    let mut totals = MethodTotals::default();
    for (method, amount) in members
        .iter()
        .map(|m| (m.payment_method.as_str(), m.amount_paid))
        .chain(
            donations
                .iter()
                .map(|d| (d.payment_method.as_str(), d.amount)),
        )
    {
        match method {
            METHOD_HANDCASH => totals.handcash += amount,
            METHOD_PHONEPAY => totals.phonepay += amount,
            _ => {}
        }
    }
    totals
}

/// grouping key for the per-admin breakdown, rows without an admin id
/// fall back to the written name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdminKey {
    Id(i32),
    Name(String),
}

fn admin_key(id: Option<i32>, name: &str) -> AdminKey {
    match id {
        Some(id) => AdminKey::Id(id),
        None => AdminKey::Name(name.to_owned()),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminTotals {
    pub name: String,
    pub collected: f64,
    pub expenses: f64,
}

/// collections and expenses grouped per admin, an admin appearing on
/// either side gets an entry seeded with zeros
pub fn by_admin(
    collections: &[collection::Model],
    expenses: &[expense::Model],
) -> BTreeMap<AdminKey, AdminTotals> {
    let mut map: BTreeMap<AdminKey, AdminTotals> = BTreeMap::new();
    for c in collections {
        let entry = map
            .entry(admin_key(c.admin_id, &c.admin_name))
            .or_insert_with(|| AdminTotals {
                name: c.admin_name.clone(),
                ..Default::default()
            });
        entry.collected += c.amount;
    }
    for e in expenses {
        let entry = map
            .entry(admin_key(e.admin_id, &e.admin_name))
            .or_insert_with(|| AdminTotals {
                name: e.admin_name.clone(),
                ..Default::default()
            });
        entry.expenses += e.amount;
    }
    map
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminRow {
    pub admin_id: Option<i32>,
    pub name: String,
    pub collected: f64,
    pub expenses: f64,
}

pub fn admin_rows(map: BTreeMap<AdminKey, AdminTotals>) -> Vec<AdminRow> {
    map.into_iter()
        .map(|(key, totals)| {
            let admin_id = match key {
                AdminKey::Id(id) => Some(id),
                AdminKey::Name(_) => None,
            };
            AdminRow {
                admin_id,
                name: totals.name,
                collected: totals.collected,
                expenses: totals.expenses,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRow {
    pub date: String,
    pub total: f64,
}

/// donation totals per calendar day, days appear in the order the
/// donations were listed
pub fn donations_by_date(donations: &[donation::Model]) -> Vec<DateRow> {
    let mut days: Vec<DateRow> = Vec::new();
    for d in donations {
        let day = display_date(d.created_at);
        match days.iter_mut().find(|row| row.date == day) {
            Some(row) => row.total += d.amount,
            None => days.push(DateRow {
                date: day,
                total: d.amount,
            }),
        }
    }
    days
}

/// which announcement is on screen now
pub fn rotation_slot(count: usize, now_secs: u64, rotate_secs: u64) -> usize {
    if count == 0 || rotate_secs == 0 {
        return 0;
    }
    ((now_secs / rotate_secs) % count as u64) as usize
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_collected: f64,
    pub total_spent: f64,
    pub available_amount: f64,
    pub label: BalanceLabel,
    pub methods: MethodTotals,
    pub by_admin: Vec<AdminRow>,
    pub by_date: Vec<DateRow>,
}

pub fn summarize(
    members: &[member::Model],
    donations: &[donation::Model],
    collections: &[collection::Model],
    expenses: &[expense::Model],
) -> Summary {
    let total_collected = total_collected(members, donations, collections);
    let total_spent = total_spent(expenses);
    let available_amount = total_collected - total_spent;
    Summary {
        total_collected,
        total_spent,
        available_amount,
        label: balance_label(available_amount),
        methods: by_payment_method(members, donations),
        by_admin: admin_rows(by_admin(collections, expenses)),
        by_date: donations_by_date(donations),
    }
}
