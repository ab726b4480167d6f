//! End-to-end expense flow against a real SQLite database.

use std::sync::Arc;

use budgetwatch_core::alerts::{AlertRepositoryTrait, AlertService};
use budgetwatch_core::budget_check::{AlertHistory, BudgetCheckService, SpendAggregator};
use budgetwatch_core::budgets::{BudgetScope, BudgetService, BudgetServiceTrait, NewBudget};
use budgetwatch_core::categories::{CategoryRepositoryTrait, NewCategory};
use budgetwatch_core::events::NoOpDomainEventSink;
use budgetwatch_core::expenses::{ExpenseCreation, ExpenseService, ExpenseServiceTrait, NewExpense};
use budgetwatch_core::utils::time_utils::FixedClock;
use budgetwatch_core::Error;
use budgetwatch_storage_sqlite::{
    create_pool, run_migrations, spawn_writer, AlertRepository, BudgetRepository,
    CategoryRepository, ExpenseRepository,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};

struct Harness {
    expenses: ExpenseService,
    budgets: BudgetService,
    expense_repo: Arc<ExpenseRepository>,
    alert_repo: Arc<AlertRepository>,
    category_id: i64,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("flow.db");
    let pool = create_pool(db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer((*pool).clone());

    let budget_repo = Arc::new(BudgetRepository::new(Arc::clone(&pool), writer.clone()));
    let expense_repo = Arc::new(ExpenseRepository::new(Arc::clone(&pool), writer.clone()));
    let alert_repo = Arc::new(AlertRepository::new(Arc::clone(&pool), writer.clone()));
    let category_repo = Arc::new(CategoryRepository::new(Arc::clone(&pool), writer));

    let category = category_repo
        .create(NewCategory {
            name: "Travel".to_string(),
            description: None,
            is_default: false,
            created_by_user_id: Some(7),
        })
        .await
        .unwrap();

    let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
    let sink = Arc::new(NoOpDomainEventSink);

    let check = Arc::new(BudgetCheckService::new(
        budget_repo.clone(),
        expense_repo.clone(),
        alert_repo.clone(),
    ));
    let alerts = Arc::new(AlertService::new(alert_repo.clone(), sink.clone(), clock.clone()));
    let expenses = ExpenseService::new(
        expense_repo.clone(),
        category_repo,
        budget_repo.clone(),
        check,
        alerts,
        sink.clone(),
        clock.clone(),
    );
    let budgets = BudgetService::new(budget_repo, expense_repo.clone(), sink, clock);

    Harness {
        expenses,
        budgets,
        expense_repo,
        alert_repo,
        category_id: category.id,
        _dir: dir,
    }
}

impl Harness {
    async fn hard_budget(&self, amount: Decimal) -> String {
        self.budgets
            .create_budget(NewBudget {
                user_id: 7,
                category_id: Some(self.category_id),
                year: 2025,
                amount,
                warning_threshold: None,
                critical_threshold: None,
                enforce_hard_limit: true,
                group_id: None,
            })
            .await
            .unwrap()
            .id()
            .to_string()
    }

    fn expense(&self, amount: Decimal, description: &str, document: Option<&str>) -> NewExpense {
        NewExpense {
            user_id: 7,
            category_id: self.category_id,
            amount,
            expense_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            description: Some(description.to_string()),
            group_id: None,
            approval_document: document.map(str::to_string),
        }
    }

    fn spent(&self) -> Decimal {
        self.expense_repo
            .get_total_spent(&BudgetScope::new(7, Some(self.category_id), 2025, None))
            .unwrap()
    }
}

#[tokio::test]
async fn test_hard_limit_flow_with_alert_dedup() {
    let h = harness().await;
    let budget_id = h.hard_budget(dec!(1000)).await;

    // 85%: first warning-tier alert.
    match h.expenses.add_expense(h.expense(dec!(850), "Flights", None)).await.unwrap() {
        ExpenseCreation::Created { alert, budget_check, .. } => {
            assert_eq!(budget_check.percentage_used, dec!(85));
            assert_eq!(alert.unwrap().threshold_level, dec!(85));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // 95%: warning already reported.
    match h.expenses.add_expense(h.expense(dec!(100), "Hotel", None)).await.unwrap() {
        ExpenseCreation::Created { alert, .. } => assert!(alert.is_none()),
        other => panic!("unexpected outcome: {:?}", other),
    }

    // 105% without evidence: blocked, nothing stored.
    let outcome = h
        .expenses
        .add_expense(h.expense(dec!(100), "Dinner", None))
        .await
        .unwrap();
    assert!(matches!(outcome, ExpenseCreation::ApprovalRequired(ref r) if r.amount == dec!(100)));
    assert_eq!(h.spent(), dec!(950));

    // With evidence: stored pending, escalates to critical.
    match h
        .expenses
        .add_expense(h.expense(dec!(100), "Dinner", Some("receipt.pdf")))
        .await
        .unwrap()
    {
        ExpenseCreation::Created { expense, alert, .. } => {
            assert!(expense.is_over_budget);
            assert!(expense.requires_approval());
            assert!(!expense.is_approved());
            assert_eq!(alert.unwrap().threshold_level, dec!(105));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(h.spent(), dec!(1050));

    let last = h.alert_repo.get_last_alert(&budget_id).unwrap().unwrap();
    assert_eq!(last.threshold_level, dec!(105));
    assert_eq!(h.alert_repo.list_by_user(7, 10).unwrap().len(), 2);

    let perf = h.budgets.get_budget_performance(&budget_id, 7).unwrap();
    assert_eq!(perf.spent_amount, dec!(1050));
    assert_eq!(perf.remaining_amount, dec!(-50));
}

#[tokio::test]
async fn test_duplicate_expense_is_rejected() {
    let h = harness().await;
    h.expenses
        .add_expense(h.expense(dec!(40), "Taxi", None))
        .await
        .unwrap();

    let err = h
        .expenses
        .add_expense(h.expense(dec!(40.00), "Taxi", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));
    assert_eq!(h.spent(), dec!(40));
}

#[tokio::test]
async fn test_monthly_and_daily_summaries() {
    let h = harness().await;
    h.hard_budget(dec!(1000)).await;
    h.expenses
        .add_expense(h.expense(dec!(850), "Flights", None))
        .await
        .unwrap();
    h.expenses
        .add_expense(h.expense(dec!(100), "Hotel", None))
        .await
        .unwrap();

    let monthly = h.expenses.get_monthly_summary(7, 2025, 2).unwrap();
    assert_eq!(monthly.total_amount, dec!(950));
    assert_eq!(monthly.transaction_count, 2);
    assert_eq!(monthly.top_category.as_deref(), Some("Travel"));
    let travel = &monthly.category_breakdown[0];
    assert_eq!(travel.category_id, h.category_id);
    assert_eq!(travel.budget_amount, Some(dec!(1000)));
    assert_eq!(travel.remaining_budget, Some(dec!(50)));
    assert!(!travel.is_over_budget);

    assert_eq!(
        h.expenses.get_monthly_summary(7, 2025, 3).unwrap().transaction_count,
        0
    );

    let daily = h
        .expenses
        .get_daily_summary(7, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
        .unwrap();
    assert_eq!(daily.total_amount, dec!(950));
    assert_eq!(daily.category_breakdown[0].budget_amount, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_cannot_both_pass_hard_limit() {
    let h = harness().await;
    h.hard_budget(dec!(1000)).await;
    h.expenses
        .add_expense(h.expense(dec!(850), "Flights", None))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        h.expenses.add_expense(h.expense(dec!(100), "Hotel", None)),
        h.expenses.add_expense(h.expense(dec!(100), "Car", None)),
    );
    let created = [first.unwrap(), second.unwrap()]
        .iter()
        .filter(|o| o.is_created())
        .count();

    assert_eq!(created, 1);
    assert_eq!(h.spent(), dec!(950));
}
