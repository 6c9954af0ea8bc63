use chrono::NaiveDate;
use engine::{
    BudgetProgress, CategoryNew, CategoryPatch, Engine, EngineError, Money, Period, QueryKey,
    TransactionKind, TransactionNew, TransactionPatch, memory::MemoryClient,
};

async fn engine_with_user(client: MemoryClient, email: &str) -> Engine<MemoryClient> {
    let mut engine = Engine::builder().client(client).build().unwrap();
    engine.sign_up(email, "password").await.unwrap().unwrap();
    engine
}

fn spend(major: i64, category_id: uuid::Uuid) -> TransactionNew {
    TransactionNew {
        amount: Money::from_major(major),
        kind: TransactionKind::Expense,
        category_id: Some(category_id),
        description: None,
        date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
    }
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    for name in ["Transport", "Food", "Rent"] {
        engine.add_category(CategoryNew::new(name)).await.unwrap();
    }

    let names: Vec<_> = engine
        .categories()
        .await
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Food", "Rent", "Transport"]);
}

#[tokio::test]
async fn duplicate_names_are_rejected_after_normalization() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    engine.add_category(CategoryNew::new("Food")).await.unwrap();

    for name in ["Food", "  Food ", "Ｆｏｏｄ"] {
        let err = engine
            .add_category(CategoryNew::new(name))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)), "{name}");
    }

    let lower = engine.add_category(CategoryNew::new("food")).await.unwrap();
    assert_eq!(lower.name, "food");
    assert_eq!(engine.categories().await.unwrap().len(), 2);
}

#[tokio::test]
async fn names_are_unique_per_user_only() {
    let client = MemoryClient::new();
    let mut alice = engine_with_user(client.detached(), "alice@example.com").await;
    let mut bob = engine_with_user(client.detached(), "bob@example.com").await;

    alice.add_category(CategoryNew::new("Food")).await.unwrap();
    bob.add_category(CategoryNew::new("Food")).await.unwrap();

    assert_eq!(alice.categories().await.unwrap().len(), 1);
    assert_eq!(bob.categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn input_is_validated() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;

    let err = engine
        .add_category(CategoryNew::new("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let err = engine
        .add_category(CategoryNew::new("Food").color("blue"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidColor(_)));

    let err = engine
        .add_category(CategoryNew::new("Food").monthly_budget(Money::new(-100)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert!(engine.categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn category_writes_invalidate_every_query() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    let period = Period::new(2024, 3).unwrap();
    let food = engine.add_category(CategoryNew::new("Food")).await.unwrap();
    engine.add_transaction(spend(20, food.id)).await.unwrap();
    engine.categories().await.unwrap();
    engine.transactions(period).await.unwrap();
    engine.monthly_summary(period).await.unwrap();

    engine
        .update_category(
            food.id,
            CategoryPatch {
                name: Some("Groceries".to_string()),
                color: Some("#F59E0B".to_string()),
                ..CategoryPatch::default()
            },
        )
        .await
        .unwrap();

    assert!(engine.cache().is_stale(QueryKey::Categories));
    assert!(engine.cache().is_stale(QueryKey::Transactions(period)));
    assert!(engine.cache().is_stale(QueryKey::Summary(period)));

    let summary = engine.monthly_summary(period).await.unwrap();
    assert_eq!(summary.by_category[0].name, "Groceries");
    assert_eq!(summary.by_category[0].color, "#f59e0b");
}

#[tokio::test]
async fn renaming_to_its_own_name_is_allowed() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    let food = engine.add_category(CategoryNew::new("Food")).await.unwrap();
    let updated = engine
        .update_category(
            food.id,
            CategoryPatch {
                name: Some("food".to_string()),
                monthly_budget: Some(Some(Money::from_major(500))),
                ..CategoryPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "food");
    assert_eq!(updated.monthly_budget, Some(Money::from_major(500)));

    let cleared = engine
        .update_category(
            food.id,
            CategoryPatch {
                monthly_budget: Some(None),
                ..CategoryPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.monthly_budget, None);
}

#[tokio::test]
async fn deleted_category_leaves_transactions_uncategorized() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    let period = Period::new(2024, 3).unwrap();
    let food = engine.add_category(CategoryNew::new("Food")).await.unwrap();
    let lunch = engine.add_transaction(spend(30, food.id)).await.unwrap();

    engine.delete_category(food.id).await.unwrap();

    let updated = engine
        .update_transaction(
            lunch.id,
            TransactionPatch {
                description: Some(Some("lunch".to_string())),
                ..TransactionPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_id, Some(food.id));
    assert_eq!(updated.category, None);
    assert_eq!(updated.category_name(), "Uncategorized");

    let transactions = engine.transactions(period).await.unwrap();
    assert_eq!(transactions[0].category_id, Some(food.id));
    assert_eq!(transactions[0].category_name(), "Uncategorized");
    let summary = engine.monthly_summary(period).await.unwrap();
    assert_eq!(summary.by_category[0].name, "Uncategorized");
    assert_eq!(summary.by_category[0].color, "#9ca3af");
}

#[tokio::test]
async fn budget_progress_from_monthly_spend() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    let period = Period::new(2024, 3).unwrap();
    let rent = engine
        .add_category(CategoryNew::new("Rent").monthly_budget(Money::from_major(500)))
        .await
        .unwrap();
    let fun = engine
        .add_category(CategoryNew::new("Fun").monthly_budget(Money::ZERO))
        .await
        .unwrap();
    engine.add_transaction(spend(600, rent.id)).await.unwrap();
    engine.add_transaction(spend(80, fun.id)).await.unwrap();

    let summary = engine.monthly_summary(period).await.unwrap();

    let progress = BudgetProgress::new(summary.spend_for(&rent.name), rent.monthly_budget);
    assert_eq!(progress.percent, Some(100.0));
    assert!(progress.over_budget);
    assert_eq!(progress.overage, Money::from_major(100));

    assert_eq!(fun.monthly_budget, None);
    let progress = BudgetProgress::new(summary.spend_for(&fun.name), fun.monthly_budget);
    assert_eq!(progress.percent, None);
    assert!(!progress.over_budget);
    assert_eq!(progress.spend, Money::from_major(80));
}

#[tokio::test]
async fn identity_changes_clear_the_cache() {
    let mut engine = engine_with_user(MemoryClient::new(), "alice@example.com").await;
    engine.add_category(CategoryNew::new("Food")).await.unwrap();
    engine.categories().await.unwrap();
    let session = engine.session().cloned().unwrap();

    engine.sign_out().await.unwrap();
    assert!(engine.cache().peek(QueryKey::Categories).is_none());
    assert!(engine.current_user().await.unwrap().is_none());
    assert!(engine.categories().await.unwrap().is_empty());
    let err = engine
        .add_category(CategoryNew::new("Rent"))
        .await
        .unwrap_err();
    assert!(err.is_unauthenticated());

    let user = engine.restore_session(session).await.unwrap();
    assert_eq!(
        user.and_then(|user| user.email).as_deref(),
        Some("alice@example.com")
    );
    assert_eq!(engine.categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sign_in_with_wrong_password_fails() {
    let client = MemoryClient::new();
    engine_with_user(client.detached(), "alice@example.com").await;

    let mut engine = Engine::builder().client(client.detached()).build().unwrap();
    let err = engine
        .sign_in("alice@example.com", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Backend(_)));
    assert!(engine.session().is_none());

    engine.sign_in("alice@example.com", "password").await.unwrap();
    assert!(engine.current_user().await.unwrap().is_some());
}
