//! Shared fixtures for integration tests

#![allow(dead_code)]

use sqlx::PgPool;

use planvest_server::config::{AccountInfo, Config, Environment, ReferralTier};

pub const JWT_SECRET: &str = "integration-secret";
pub const WEBHOOK_SECRET: &str = "integration-hook";

pub fn test_config() -> Config {
    Config {
        database_url: test_database_url(),
        environment: Environment::Development,
        port: 0,
        db_max_connections: 2,
        rate_limit_rps: 1000,
        trust_proxy_headers: false,
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        cors_allowed_origins: None,
        log_level: "debug".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        min_withdrawal: 500,
        max_withdrawal: 50_000,
        deposit_account: AccountInfo {
            account_holder_name: "Planvest Treasury".to_string(),
            account_number: "03001234567".to_string(),
            payment_channel: "Easypaisa".to_string(),
        },
        referral_tiers: vec![
            ReferralTier {
                required_referrals: 1,
                bonus: 100,
            },
            ReferralTier {
                required_referrals: 5,
                bonus: 500,
            },
        ],
        external_website: None,
    }
}

pub fn test_database_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/planvest_test".to_string())
}

/// Pool that never connects unless a query runs
pub fn lazy_pool() -> PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&test_database_url())
        .expect("Failed to build lazy pool")
}

/// Connected and migrated pool for `#[ignore]` database tests
pub async fn setup_test_db() -> PgPool {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&test_database_url())
        .await
        .expect("Failed to connect to test database");

    planvest_server::db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
