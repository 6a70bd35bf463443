pub mod admin;
pub mod announcement;
pub mod collection;
pub mod donation;
pub mod expense;
pub mod member;
pub mod schedule;
pub mod stat;
