//! Planvest backend library
//!
//! Investment plans, deposit and withdrawal requests, referral tiers and
//! daily earnings accrual behind a JSON API.

pub mod auth;
pub mod config;
pub mod db;
pub mod deposit;
pub mod earnings;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod plan;
pub mod profile;
pub mod referral;
pub mod routes;
pub mod state;
pub mod sync;
pub mod wallet;
pub mod withdrawal;
