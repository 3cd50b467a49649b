//! Service configuration

use std::collections::HashMap;

use core_kernel::TenantId;
use domain_ledger::ChartOfAccounts;
use serde::Deserialize;

/// Chart-of-accounts configuration, one chart per tenant
///
/// Tenants without an override post against the default chart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantCharts {
    /// Chart used when no override exists for the tenant
    #[serde(default)]
    pub default: ChartOfAccounts,
    /// Per-tenant replacement charts
    #[serde(default)]
    pub overrides: HashMap<TenantId, ChartOfAccounts>,
}

impl TenantCharts {
    /// The chart in effect for one tenant
    pub fn chart_for(&self, tenant_id: TenantId) -> &ChartOfAccounts {
        self.overrides.get(&tenant_id).unwrap_or(&self.default)
    }
}

/// Service configuration
///
/// Loaded from the environment with the `LEDGER_` prefix; the charts
/// carry the standard codes unless the tenant configuration overrides
/// them.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Database URL
    pub database_url: String,
    /// Maximum database connections
    pub max_connections: u32,
    /// Minimum database connections
    pub min_connections: u32,
    /// Log level
    pub log_level: String,
    /// Chart of accounts per tenant
    #[serde(default)]
    pub charts: TenantCharts,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/ledger".to_string(),
            max_connections: 10,
            min_connections: 2,
            log_level: "info".to_string(),
            charts: TenantCharts::default(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LEDGER"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.charts.default.accounts_receivable, "1100");
    }

    #[test]
    fn test_chart_resolves_per_tenant() {
        let tenant_id = TenantId::new();
        let mut custom = ChartOfAccounts::default();
        custom.accounts_receivable = "1105".to_string();

        let mut charts = TenantCharts::default();
        charts.overrides.insert(tenant_id, custom);

        assert_eq!(charts.chart_for(tenant_id).accounts_receivable, "1105");
        assert_eq!(
            charts.chart_for(TenantId::new()).accounts_receivable,
            "1100"
        );
    }
}
