//! Scheduled aging snapshot runner
//!
//! Snapshots every customer in one tenant as of a reference date. Meant
//! to be invoked by an external scheduler (cron or similar); each run is
//! safe to repeat because snapshot creation is idempotent per
//! (customer, date).
//!
//! # Environment Variables
//!
//! * `LEDGER_DATABASE_URL` - PostgreSQL connection string
//! * `LEDGER_LOG_LEVEL` - Log level (default: info)
//! * `SNAPSHOT_TENANT_ID` - Tenant to process (required)
//! * `SNAPSHOT_ACTOR_ID` - Actor recorded on generated snapshots (required)
//! * `SNAPSHOT_CURRENCY` - ISO 4217 currency code (default: USD)
//! * `SNAPSHOT_DATE` - Reference date, YYYY-MM-DD (default: today)

use chrono::{NaiveDate, Utc};
use core_kernel::{ActorId, Currency, TenantId};
use ledger_service::{init_telemetry, ServiceConfig, Services};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env().unwrap_or_default();
    init_telemetry(&config.log_level);

    let tenant_id: TenantId = required_env("SNAPSHOT_TENANT_ID")?.parse()?;
    let actor_id: ActorId = required_env("SNAPSHOT_ACTOR_ID")?.parse()?;
    let currency = match std::env::var("SNAPSHOT_CURRENCY") {
        Ok(code) => Currency::from_code(&code)
            .ok_or_else(|| format!("unknown currency code '{}'", code))?,
        Err(_) => Currency::USD,
    };
    let as_of: NaiveDate = match std::env::var("SNAPSHOT_DATE") {
        Ok(date) => date.parse()?,
        Err(_) => Utc::now().date_naive(),
    };

    tracing::info!(%tenant_id, %as_of, %currency, "starting aging snapshot batch");

    let services = Services::connect(&config).await?;
    let report = services
        .aging
        .batch_snapshots(tenant_id, currency, as_of, actor_id)
        .await?;

    tracing::info!(
        created = report.created.len(),
        existing = report.already_existed.len(),
        failed = report.failed.len(),
        "aging snapshot batch finished"
    );

    if !report.failed.is_empty() {
        // Non-zero exit so the scheduler flags the partial failure
        std::process::exit(1);
    }
    Ok(())
}

fn required_env(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("{} must be set", name))
}
