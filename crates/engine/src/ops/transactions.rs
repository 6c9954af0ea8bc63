use api_types::transaction::{self as wire, TransactionInsert, TransactionRow};
use uuid::Uuid;

use crate::{
    CategoryRef, EngineError, Period, ResultEngine, Summary, Transaction, TransactionNew,
    TransactionPatch,
    backend::{DataClient, FilterOp, Query, Table, from_row, to_row},
    cache::{CachedValue, QueryKey},
    stats::aggregate,
    util::{ensure_non_negative, normalize_description},
};

use super::{Engine, parse_rows};

/// Transactions shown in the recent-activity list.
pub const RECENT_LIMIT: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn with_category() -> Query {
    Query::all().embed(Table::Categories, "category_id", &["id", "name", "color"])
}

impl<C: DataClient> Engine<C> {
    /// The month's transactions with their category joined, newest first.
    pub async fn transactions(&mut self, period: Period) -> ResultEngine<Vec<Transaction>> {
        let key = QueryKey::Transactions(period);
        if let Some(items) = self.cache.transactions(key) {
            return Ok(items.to_vec());
        }

        let query = with_category()
            .filter(
                "transaction_date",
                FilterOp::Gte,
                period.first_day().format(DATE_FORMAT).to_string(),
            )
            .filter(
                "transaction_date",
                FilterOp::Lte,
                period.last_day().format(DATE_FORMAT).to_string(),
            )
            .order_desc("transaction_date");
        let items = self.fetch_transactions(&query).await?;
        tracing::debug!(period = %period, "fetched {} transactions", items.len());
        self.cache
            .store(key, CachedValue::Transactions(items.clone()));
        Ok(items)
    }

    /// The latest transactions across every month.
    pub async fn recent_transactions(&mut self) -> ResultEngine<Vec<Transaction>> {
        let key = QueryKey::RecentTransactions;
        if let Some(items) = self.cache.transactions(key) {
            return Ok(items.to_vec());
        }

        let query = with_category()
            .order_desc("transaction_date")
            .limit(RECENT_LIMIT);
        let items = self.fetch_transactions(&query).await?;
        self.cache
            .store(key, CachedValue::Transactions(items.clone()));
        Ok(items)
    }

    /// Totals and the expense breakdown of a month.
    pub async fn monthly_summary(&mut self, period: Period) -> ResultEngine<Summary> {
        if let Some(summary) = self.cache.summary(period) {
            return Ok(summary.clone());
        }

        let summary = aggregate(&self.transactions(period).await?);
        self.cache.store(
            QueryKey::Summary(period),
            CachedValue::Summary(summary.clone()),
        );
        Ok(summary)
    }

    pub async fn add_transaction(&mut self, input: TransactionNew) -> ResultEngine<Transaction> {
        let amount = ensure_non_negative(input.amount)?;
        let description = normalize_description(input.description.as_deref())?;
        let user = self.require_user().await?;
        let category = match input.category_id {
            Some(id) => Some(self.category_ref(id).await?),
            None => None,
        };

        let payload = TransactionInsert {
            user_id: user.id,
            amount: amount.to_stored(),
            kind: input.kind.into(),
            category_id: input.category_id,
            description,
            transaction_date: input.date,
        };
        let row = self
            .client
            .insert(Table::Transactions, to_row(&payload)?)
            .await?;
        self.cache.invalidate_transactions();

        let mut transaction = Transaction::from(from_row::<TransactionRow>(row)?);
        transaction.category = category;
        tracing::info!(transaction_id = %transaction.id, kind = transaction.kind.as_str(), "transaction created");
        Ok(transaction)
    }

    pub async fn update_transaction(
        &mut self,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let amount = patch.amount.map(ensure_non_negative).transpose()?;
        let description = patch
            .description
            .map(|description| normalize_description(description.as_deref()))
            .transpose()?;
        let category = match patch.category_id {
            Some(Some(category_id)) => Some(Some(self.category_ref(category_id).await?)),
            Some(None) => Some(None),
            None => None,
        };

        let payload = wire::TransactionPatch {
            amount: amount.map(|amount| amount.to_stored()),
            kind: patch.kind.map(Into::into),
            category_id: patch.category_id,
            description,
            transaction_date: patch.date,
        };
        let row = self
            .client
            .update(Table::Transactions, id, to_row(&payload)?)
            .await?;
        self.cache.invalidate_transactions();

        let mut transaction = Transaction::from(from_row::<TransactionRow>(row)?);
        transaction.category = match category {
            Some(category) => category,
            None => match transaction.category_id {
                Some(category_id) => match self.category_ref(category_id).await {
                    Ok(category) => Some(category),
                    // Deleted category: the row reads as uncategorized.
                    Err(EngineError::KeyNotFound(_)) => None,
                    Err(err) => {
                        tracing::warn!(
                            %err,
                            %category_id,
                            "category join unavailable after update"
                        );
                        None
                    }
                },
                None => None,
            },
        };
        tracing::info!(transaction_id = %transaction.id, "transaction updated");
        Ok(transaction)
    }

    pub async fn delete_transaction(&mut self, id: Uuid) -> ResultEngine<()> {
        self.client.delete(Table::Transactions, id).await?;
        self.cache.invalidate_transactions();
        tracing::info!(transaction_id = %id, "transaction deleted");
        Ok(())
    }

    async fn fetch_transactions(&self, query: &Query) -> ResultEngine<Vec<Transaction>> {
        let rows = self.client.select(Table::Transactions, query).await?;
        parse_rows::<TransactionRow, Transaction>(rows)
    }

    /// The user's category with `id`, as joined into a transaction.
    async fn category_ref(&mut self, id: Uuid) -> ResultEngine<CategoryRef> {
        self.categories()
            .await?
            .into_iter()
            .find(|category| category.id == id)
            .map(|category| CategoryRef {
                id: category.id,
                name: category.name,
                color: category.color,
            })
            .ok_or_else(|| EngineError::KeyNotFound(format!("category {id}")))
    }
}
