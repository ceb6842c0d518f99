//! API handlers for the Planvest backend

pub mod deposit;
pub mod health;
pub mod plan;
pub mod profile;
pub mod referral;
pub mod site;
pub mod sync;
pub mod wallet;
pub mod withdrawal;
