/// Item model, transfer shapes and database operations
///
/// Every item belongs to exactly one user and is deleted together with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE item (
///     id UUID PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description VARCHAR(255),
///     owner_id UUID NOT NULL REFERENCES "user" (id) ON DELETE CASCADE
/// );
/// ```

use super::{double_option, ListParams, Page};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

/// Item row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,

    /// Owning user; the item goes when the owner goes
    pub owner_id: Uuid,
}

/// Item creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemCreate {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Item update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,

    /// `null` clears the description
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<Option<String>>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Item as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPublic {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl From<Item> for ItemPublic {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
        }
    }
}

/// One page of items
pub type ItemsPublic = Page<ItemPublic>;

impl Item {
    /// Inserts an item owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the owner doesn't exist.
    pub async fn create(pool: &PgPool, data: ItemCreate, owner_id: Uuid) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO item (id, title, description, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.title)
        .bind(data.description)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, title, description, owner_id FROM item WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Applies an update; `None` if the item doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: ItemUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE item SET ");
        let mut set = query.separated(", ");

        if let Some(title) = data.title {
            set.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = data.description {
            set.push("description = ").push_bind_unseparated(description);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING id, title, description, owner_id");

        let item = query.build_query_as::<Item>().fetch_optional(pool).await?;

        Ok(item)
    }

    /// Deletes an item; false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM item WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all items ordered by title
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id
            FROM item
            ORDER BY title ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Lists the items of one owner ordered by title
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        params: ListParams,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id
            FROM item
            WHERE owner_id = $1
            ORDER BY title ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn count_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// One page of items, optionally restricted to one owner
    pub async fn page(
        pool: &PgPool,
        owner_id: Option<Uuid>,
        params: ListParams,
    ) -> Result<ItemsPublic, sqlx::Error> {
        let (items, count) = match owner_id {
            Some(owner_id) => (
                Self::list_by_owner(pool, owner_id, params).await?,
                Self::count_by_owner(pool, owner_id).await?,
            ),
            None => (Self::list(pool, params).await?, Self::count(pool).await?),
        };

        Ok(Page::from_rows(items, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_title_must_not_be_empty() {
        let create = ItemCreate {
            title: String::new(),
            description: None,
        };

        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_item_description_max_length() {
        let create = ItemCreate {
            title: "Cake".to_string(),
            description: Some("a".repeat(256)),
        };
        assert!(create.validate().is_err());

        let create = ItemCreate {
            title: "Cake".to_string(),
            description: Some("a".repeat(255)),
        };
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_item_update_empty_title_rejected() {
        let update = ItemUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_item_update_clear_description() {
        let update: ItemUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert!(update.title.is_none());
        assert!(!update.is_empty());
        assert!(ItemUpdate::default().is_empty());
    }

    #[test]
    fn test_item_public_from_row() {
        let item = Item {
            id: Uuid::new_v4(),
            title: "Cake".to_string(),
            description: Some("Chocolate".to_string()),
            owner_id: Uuid::new_v4(),
        };

        let public = ItemPublic::from(item.clone());
        assert_eq!(public.id, item.id);
        assert_eq!(public.owner_id, item.owner_id);
        assert_eq!(public.description.as_deref(), Some("Chocolate"));
    }
}
