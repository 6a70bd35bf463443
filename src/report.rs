use crate::summary::{display_date, display_naive_date};
use chrono::NaiveDate;
use entity::{collection, donation, expense, member};

pub const REPORT_HEADERS: [&str; 8] = [
    "Date",
    "Type",
    "Name/Purpose",
    "Amount",
    "Payment Method",
    "Admin",
    "Phone",
    "Address",
];

/// manual collections are mixed cash, there is no single method
const METHOD_MIXED: &str = "Mixed";
const ANONYMOUS: &str = "Anonymous";

/// one exported line, already stringified
pub type ReportRow = [String; 8];

/// amounts render the way a plain number does on the page,
/// no forced decimals
fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// fixed section order: member payments, donations, collections,
/// then expenses with the amount negated
pub fn report_rows(
    members: &[member::Model],
    donations: &[donation::Model],
    collections: &[collection::Model],
    expenses: &[expense::Model],
) -> Vec<ReportRow> {
    let mut rows =
        Vec::with_capacity(members.len() + donations.len() + collections.len() + expenses.len());
    for m in members {
        rows.push([
            display_date(m.created_at),
            "Member Payment".to_owned(),
            m.name.clone(),
            format_amount(m.amount_paid),
            m.payment_method.clone(),
            m.admin_name.clone(),
            m.phone.clone(),
            m.address.clone(),
        ]);
    }
    for d in donations {
        rows.push([
            display_date(d.created_at),
            "Donation".to_owned(),
            d.donor_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| ANONYMOUS.to_owned()),
            format_amount(d.amount),
            d.payment_method.clone(),
            d.admin_name.clone(),
            d.donor_phone.clone().unwrap_or_default(),
            String::new(),
        ]);
    }
    for c in collections {
        rows.push([
            display_naive_date(c.date),
            "Admin Collection".to_owned(),
            c.admin_name.clone(),
            format_amount(c.amount),
            METHOD_MIXED.to_owned(),
            c.admin_name.clone(),
            String::new(),
            String::new(),
        ]);
    }
    for e in expenses {
        rows.push([
            display_naive_date(e.date),
            "Expense".to_owned(),
            e.purpose.clone(),
            format_amount(-e.amount),
            "Expense".to_owned(),
            e.admin_name.clone(),
            String::new(),
            String::new(),
        ]);
    }
    rows
}

/// every field is quoted, embedded quotes are doubled
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn to_csv(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str(&REPORT_HEADERS.map(|h| quote(h)).join(","));
    out.push('\n');
    for row in rows {
        let quoted: Vec<String> = row.iter().map(|f| quote(f)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    out
}

pub fn filename(event: &str, date: NaiveDate) -> String {
    format!("{}-report-{}.csv", event, date.format("%Y-%m-%d"))
}
