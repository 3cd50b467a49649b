//! Ledger Service Layer
//!
//! The in-process facade callers use once tenant and actor have been
//! resolved. Each service wires a pure domain engine to its repositories;
//! every mutating operation routes through the idempotent command log.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_service::{ServiceConfig, Services};
//!
//! let config = ServiceConfig::from_env()?;
//! let services = Services::connect(&config).await?;
//! let result = services.payments.apply(tenant, actor, "key-1", event).await?;
//! ```

pub mod config;
pub mod telemetry;
pub mod payments;
pub mod credit;
pub mod aging;
pub mod error;

pub use config::{ServiceConfig, TenantCharts};
pub use telemetry::init_telemetry;
pub use payments::{PaymentLedgerService, PaymentPostingResult};
pub use credit::CreditService;
pub use aging::{AgingService, BatchSnapshotReport};
pub use error::ServiceError;

use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabasePool};

/// The assembled service layer
#[derive(Debug, Clone)]
pub struct Services {
    pub payments: PaymentLedgerService,
    pub credit: CreditService,
    pub aging: AgingService,
}

impl Services {
    /// Builds the services over an existing pool
    pub fn new(pool: DatabasePool, config: &ServiceConfig) -> Self {
        Self {
            payments: PaymentLedgerService::new(pool.clone(), config.charts.clone()),
            credit: CreditService::new(pool.clone()),
            aging: AgingService::new(pool),
        }
    }

    /// Connects to the database, applies migrations, and builds the
    /// services
    pub async fn connect(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let pool = create_pool(
            DatabaseConfig::new(&config.database_url)
                .max_connections(config.max_connections)
                .min_connections(config.min_connections),
        )
        .await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool, config))
    }
}
