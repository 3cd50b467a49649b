//! Integration tests for the service layer
//!
//! The default suite exercises the cross-domain workflows that need no
//! storage. Tests that need live PostgreSQL run against a testcontainer
//! and are marked `#[ignore]`; run them with `cargo test -- --ignored`
//! when Docker is available.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, TenantId};
use rust_decimal_macros::dec;
use test_utils::{
    assert_entries_balance, assert_single_sided, credit_profile, standard_chart,
    CreditLimitBuilder, DateFixtures, IdFixtures, MoneyFixtures, OpenInvoiceBuilder,
    PaymentEventBuilder,
};

mod payment_posting_workflow {
    use super::*;
    use core_kernel::{InvoiceId, PaymentId};
    use domain_ledger::{build_group, ReversalMethod};

    /// The full cash lifecycle: receive, allocate, and verify the net
    /// effect an accountant would expect.
    #[test]
    fn test_cash_payment_lifecycle_balances() {
        let tenant_id = IdFixtures::tenant_id();
        let chart = standard_chart();
        let payment_id = PaymentId::new();

        let created = PaymentEventBuilder::new()
            .with_payment_id(payment_id)
            .with_amount(MoneyFixtures::usd_payment())
            .with_method("cash")
            .created();
        let allocated = PaymentEventBuilder::new()
            .with_payment_id(payment_id)
            .with_amount(MoneyFixtures::usd_payment())
            .allocated(InvoiceId::new());

        let mut entries = Vec::new();
        for event in [&created, &allocated] {
            let group = build_group(tenant_id, &chart, event).expect("balanced group");
            entries.extend(group.into_entries());
        }

        assert_entries_balance(&entries);
        assert_single_sided(&entries);

        let cash_net: i64 = entries
            .iter()
            .filter(|e| e.account_code == "1201")
            .map(|e| e.debit.minor_units() - e.credit.minor_units())
            .sum();
        let ar_net: i64 = entries
            .iter()
            .filter(|e| e.account_code == "1100")
            .map(|e| e.debit.minor_units() - e.credit.minor_units())
            .sum();

        assert_eq!(cash_net, 50_000);
        assert_eq!(ar_net, -50_000);
    }

    #[test]
    fn test_chargeback_builds_three_balanced_legs() {
        let tenant_id = IdFixtures::tenant_id();
        let chart = standard_chart();

        let event = PaymentEventBuilder::new()
            .with_amount(Money::new(dec!(120.00), Currency::USD))
            .with_method("card")
            .reversed(ReversalMethod::Chargeback);

        let group = build_group(tenant_id, &chart, &event).expect("balanced group");
        assert_eq!(group.legs.len(), 3);

        let entries = group.into_entries();
        assert_entries_balance(&entries);
        assert_single_sided(&entries);
    }
}

mod credit_decision_workflow {
    use super::*;
    use domain_credit::{evaluate, CustomerStatus, DecisionDetail, DecisionReason};

    /// Limit 1000, exposure 800, proposal 250: denied with excess 50.
    #[test]
    fn test_exposure_over_limit_denied_with_excess() {
        let profile = credit_profile(
            CustomerStatus::Active,
            Money::new(dec!(800.00), Currency::USD),
            MoneyFixtures::usd_zero(),
        );
        let limits = vec![CreditLimitBuilder::new()
            .with_customer_id(profile.customer_id)
            .with_tenant_id(profile.tenant_id)
            .with_amount(MoneyFixtures::usd_limit())
            .approved()];

        let decision = evaluate(
            &profile,
            &limits,
            Money::new(dec!(250.00), Currency::USD),
            DateFixtures::as_of(),
        )
        .expect("evaluation succeeds");

        assert!(!decision.allowed);
        assert_eq!(decision.reason, DecisionReason::CreditLimitExceeded);
        match decision.detail {
            DecisionDetail::Evaluated { excess, .. } => {
                assert_eq!(excess, Some(Money::new(dec!(50.00), Currency::USD)));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_revoked_limit_means_unlimited_credit() {
        let profile = credit_profile(
            CustomerStatus::Active,
            Money::new(dec!(5000.00), Currency::USD),
            MoneyFixtures::usd_zero(),
        );
        let mut limit = CreditLimitBuilder::new()
            .with_customer_id(profile.customer_id)
            .with_tenant_id(profile.tenant_id)
            .approved();
        limit.revoke("credit review").expect("approved limit revokes");

        let decision = evaluate(
            &profile,
            &[limit],
            MoneyFixtures::usd_100(),
            DateFixtures::as_of(),
        )
        .expect("evaluation succeeds");

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::NoActiveLimit);
    }
}

mod aging_workflow {
    use super::*;
    use domain_aging::compute_buckets;

    /// Invoice due 45 days before the reference date lands in 31-60.
    #[test]
    fn test_45_day_overdue_invoice_bucketed() {
        let invoices = vec![
            OpenInvoiceBuilder::new()
                .with_balance(Money::new(dec!(120.00), Currency::USD))
                .due_on(DateFixtures::due_45_days_ago())
                .build(),
            OpenInvoiceBuilder::new()
                .with_balance(Money::new(dec!(80.00), Currency::USD))
                .due_on(NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"))
                .build(),
        ];

        let buckets = compute_buckets(&invoices, DateFixtures::as_of(), Currency::USD)
            .expect("bucketing succeeds");

        assert_eq!(buckets.days_31_60.amount(), dec!(120.00));
        assert_eq!(buckets.current.amount(), dec!(80.00));
        assert_eq!(buckets.total_outstanding.amount(), dec!(200.00));
    }
}

mod database_workflows {
    use super::*;
    use core_kernel::PaymentId;
    use ledger_service::{ServiceConfig, ServiceError, Services};
    use test_utils::create_isolated_test_database;

    async fn seed_customer(
        pool: &sqlx::PgPool,
        tenant_id: TenantId,
        customer_id: core_kernel::CustomerId,
        status: &str,
    ) {
        sqlx::query(
            "INSERT INTO customers (id, tenant_id, name, status) VALUES ($1, $2, $3, $4)",
        )
        .bind(*customer_id.as_uuid())
        .bind(*tenant_id.as_uuid())
        .bind("Acme Pty Ltd")
        .bind(status)
        .execute(pool)
        .await
        .expect("customer seeds");
    }

    async fn seed_invoice(
        pool: &sqlx::PgPool,
        tenant_id: TenantId,
        customer_id: core_kernel::CustomerId,
        balance: rust_decimal::Decimal,
        currency: &str,
        due_on: NaiveDate,
    ) {
        sqlx::query(
            "INSERT INTO invoices (id, tenant_id, customer_id, status, balance, currency, issued_on, due_on)
             VALUES ($1, $2, $3, 'open', $4, $5, $6, $7)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(balance)
        .bind(currency)
        .bind(DateFixtures::window_start())
        .bind(due_on)
        .execute(pool)
        .await
        .expect("invoice seeds");
    }

    /// Same idempotency key twice: one audit row, one set of ledger
    /// entries, second call served from the log.
    #[tokio::test]
    #[ignore = "requires Docker for the PostgreSQL testcontainer"]
    async fn test_payment_posting_is_idempotent() {
        let db = create_isolated_test_database().await.expect("test database");
        let services = Services::new(db.pool().clone(), &ServiceConfig::default());

        let tenant_id = IdFixtures::tenant_id();
        let actor_id = IdFixtures::actor_id();
        let payment_id = PaymentId::new();
        let event = PaymentEventBuilder::new()
            .with_payment_id(payment_id)
            .with_method("cash")
            .created();

        let first = services
            .payments
            .apply(tenant_id, actor_id, "cmd-0001", event.clone())
            .await
            .expect("first apply succeeds");
        assert!(!first.duplicate);
        assert_entries_balance(&first.entries);

        let second = services
            .payments
            .apply(tenant_id, actor_id, "cmd-0001", event)
            .await
            .expect("replay succeeds");
        assert!(second.duplicate);
        assert_eq!(second.group_id, first.group_id);

        let recorded = services
            .payments
            .recorded_payment_amount(tenant_id, payment_id)
            .await
            .expect("lookup succeeds")
            .expect("payment recorded");
        assert_eq!(recorded, MoneyFixtures::usd_payment());

        let summary = services
            .payments
            .payment_ledger_summary(tenant_id, payment_id)
            .await
            .expect("summary succeeds")
            .expect("payment has entries");
        assert!(summary.balanced);
        assert_eq!(summary.total_debits, MoneyFixtures::usd_payment());
    }

    /// An allocation reversal larger than the payment ever posted is
    /// rejected before anything is written.
    #[tokio::test]
    #[ignore = "requires Docker for the PostgreSQL testcontainer"]
    async fn test_allocation_reversal_bounded_by_recorded_payment() {
        let db = create_isolated_test_database().await.expect("test database");
        let services = Services::new(db.pool().clone(), &ServiceConfig::default());

        let tenant_id = IdFixtures::tenant_id();
        let actor_id = IdFixtures::actor_id();
        let payment_id = PaymentId::new();

        services
            .payments
            .apply(
                tenant_id,
                actor_id,
                "cmd-0001",
                PaymentEventBuilder::new()
                    .with_payment_id(payment_id)
                    .with_method("cash")
                    .created(),
            )
            .await
            .expect("payment posts");

        let oversized = PaymentEventBuilder::new()
            .with_payment_id(payment_id)
            .with_amount(Money::new(dec!(1_000_000.00), Currency::USD))
            .allocation_reversed(core_kernel::InvoiceId::new());
        let rejected = services
            .payments
            .apply(tenant_id, actor_id, "cmd-0002", oversized)
            .await;
        assert!(matches!(
            rejected,
            Err(ServiceError::Ledger(
                domain_ledger::LedgerError::ReversalExceedsRecorded { .. }
            ))
        ));
        assert!(services
            .payments
            .entries_for_reference(tenant_id, "PAY-2026-0001-AR")
            .await
            .expect("lookup succeeds")
            .is_empty());

        let within = PaymentEventBuilder::new()
            .with_payment_id(payment_id)
            .with_amount(Money::new(dec!(200.00), Currency::USD))
            .allocation_reversed(core_kernel::InvoiceId::new());
        let posted = services
            .payments
            .apply(tenant_id, actor_id, "cmd-0003", within)
            .await
            .expect("bounded reversal posts");
        assert_entries_balance(&posted.entries);
    }

    /// One bad customer must not abort the batch; the failure is
    /// collected and the rest of the tenant is still snapshotted.
    #[tokio::test]
    #[ignore = "requires Docker for the PostgreSQL testcontainer"]
    async fn test_batch_snapshots_collect_per_customer_failures() {
        let db = create_isolated_test_database().await.expect("test database");
        let services = Services::new(db.pool().clone(), &ServiceConfig::default());

        let tenant_id = IdFixtures::tenant_id();
        let healthy = core_kernel::CustomerId::new();
        let mismatched = core_kernel::CustomerId::new();
        seed_customer(db.pool(), tenant_id, healthy, "active").await;
        seed_customer(db.pool(), tenant_id, mismatched, "active").await;
        seed_invoice(
            db.pool(),
            tenant_id,
            healthy,
            dec!(120.00),
            "USD",
            DateFixtures::due_45_days_ago(),
        )
        .await;
        seed_invoice(
            db.pool(),
            tenant_id,
            mismatched,
            dec!(90.00),
            "EUR",
            DateFixtures::due_45_days_ago(),
        )
        .await;

        let report = services
            .aging
            .batch_snapshots(
                tenant_id,
                Currency::USD,
                DateFixtures::as_of(),
                IdFixtures::actor_id(),
            )
            .await
            .expect("batch completes");

        assert_eq!(report.created, vec![healthy]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, mismatched);
        assert_eq!(report.processed(), 2);
    }

    #[tokio::test]
    #[ignore = "requires Docker for the PostgreSQL testcontainer"]
    async fn test_snapshot_created_once_per_date() {
        let db = create_isolated_test_database().await.expect("test database");
        let services = Services::new(db.pool().clone(), &ServiceConfig::default());

        let tenant_id = IdFixtures::tenant_id();
        let customer_id = IdFixtures::customer_id();
        seed_customer(db.pool(), tenant_id, customer_id, "active").await;
        seed_invoice(
            db.pool(),
            tenant_id,
            customer_id,
            dec!(120.00),
            "USD",
            DateFixtures::due_45_days_ago(),
        )
        .await;

        let first = services
            .aging
            .snapshot(
                tenant_id,
                customer_id,
                Currency::USD,
                DateFixtures::as_of(),
                domain_aging::GenerationMethod::OnDemand,
                IdFixtures::actor_id(),
            )
            .await
            .expect("first snapshot succeeds");
        assert!(first.was_created());
        assert_eq!(
            first.snapshot().buckets.days_31_60.amount(),
            dec!(120.00)
        );

        let second = services
            .aging
            .snapshot(
                tenant_id,
                customer_id,
                Currency::USD,
                DateFixtures::as_of(),
                domain_aging::GenerationMethod::OnDemand,
                IdFixtures::actor_id(),
            )
            .await
            .expect("second snapshot succeeds");
        assert!(!second.was_created());
        assert_eq!(second.snapshot().id, first.snapshot().id);
    }
}
