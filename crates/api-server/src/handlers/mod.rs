//! HTTP request handlers.

pub mod admin;
pub mod auth;
pub mod badges;
pub mod health;
pub mod ratings;
pub mod traders;
pub mod uploads;
pub mod users;
