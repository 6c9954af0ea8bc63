use api_types::category::{self as wire, CategoryInsert, CategoryRow};
use uuid::Uuid;

use crate::{
    Category, CategoryNew, CategoryPatch, EngineError, Money, ResultEngine,
    backend::{DataClient, Query, Table, from_row, to_row},
    cache::{CachedValue, QueryKey},
    util::{category_key, normalize_budget, normalize_color, normalize_required_name},
};

use super::{Engine, parse_rows};

impl<C: DataClient> Engine<C> {
    /// All categories of the signed-in user, ordered by name.
    pub async fn categories(&mut self) -> ResultEngine<Vec<Category>> {
        if let Some(items) = self.cache.categories() {
            return Ok(items.to_vec());
        }

        let rows = self
            .client
            .select(Table::Categories, &Query::all().order_asc("name"))
            .await?;
        let items = parse_rows::<CategoryRow, Category>(rows)?;
        tracing::debug!("fetched {} categories", items.len());
        self.cache
            .store(QueryKey::Categories, CachedValue::Categories(items.clone()));
        Ok(items)
    }

    pub async fn add_category(&mut self, input: CategoryNew) -> ResultEngine<Category> {
        let name = normalize_required_name(&input.name, "category")?;
        let color = normalize_color(&input.color)?;
        let budget = normalize_budget(input.monthly_budget)?;
        let user = self.require_user().await?;
        self.ensure_unique_name(&name, None).await?;

        let payload = CategoryInsert {
            user_id: user.id,
            name,
            color,
            monthly_budget: budget.unwrap_or(Money::ZERO).to_stored(),
        };
        let row = self
            .client
            .insert(Table::Categories, to_row(&payload)?)
            .await?;
        self.cache.invalidate_categories();

        let category = Category::from(from_row::<CategoryRow>(row)?);
        tracing::info!(category_id = %category.id, "category created");
        Ok(category)
    }

    pub async fn update_category(
        &mut self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "category"))
            .transpose()?;
        let color = patch.color.as_deref().map(normalize_color).transpose()?;
        let monthly_budget = patch
            .monthly_budget
            .map(|budget| {
                normalize_budget(budget).map(|budget| budget.unwrap_or(Money::ZERO).to_stored())
            })
            .transpose()?;
        if let Some(name) = &name {
            self.ensure_unique_name(name, Some(id)).await?;
        }

        let payload = wire::CategoryPatch {
            name,
            color,
            monthly_budget,
        };
        let row = self
            .client
            .update(Table::Categories, id, to_row(&payload)?)
            .await?;
        self.cache.invalidate_categories();

        let category = Category::from(from_row::<CategoryRow>(row)?);
        tracing::info!(category_id = %category.id, "category updated");
        Ok(category)
    }

    /// Existing transactions keep their reference; they read as
    /// uncategorized once the joined record is gone.
    pub async fn delete_category(&mut self, id: Uuid) -> ResultEngine<()> {
        self.client.delete(Table::Categories, id).await?;
        self.cache.invalidate_categories();
        tracing::info!(category_id = %id, "category deleted");
        Ok(())
    }

    /// Rejects a name that collides, after normalization, with another
    /// category of the user.
    async fn ensure_unique_name(&mut self, name: &str, except: Option<Uuid>) -> ResultEngine<()> {
        let key = category_key(name);
        let taken = self
            .categories()
            .await?
            .iter()
            .any(|category| Some(category.id) != except && category_key(&category.name) == key);
        if taken {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
