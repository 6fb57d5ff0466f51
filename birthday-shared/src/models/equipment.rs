/// Sport equipment and equipment types
///
/// Equipment types are categories such as "ball" or "field". A piece of
/// equipment has a type and may be listed as needed by a sport.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sport_equipment_type (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description VARCHAR(255) NOT NULL
/// );
///
/// CREATE TABLE sport_equipment (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description VARCHAR(255) NOT NULL,
///     type_id UUID REFERENCES sport_equipment_type (id) ON DELETE SET NULL,
///     sport_id UUID REFERENCES sport (id) ON DELETE SET NULL
/// );
/// ```

use super::{double_option, ListParams, Page};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

/// Equipment category row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SportEquipmentType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SportEquipmentTypeCreate {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SportEquipmentTypeUpdate {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

/// Equipment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SportEquipment {
    pub id: Uuid,
    pub name: String,
    pub description: String,

    /// Category of this piece of equipment
    pub type_id: Option<Uuid>,

    /// Sport that needs this equipment
    pub sport_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SportEquipmentCreate {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: String,

    #[serde(default)]
    pub type_id: Option<Uuid>,

    #[serde(default)]
    pub sport_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SportEquipmentUpdate {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub type_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub sport_id: Option<Option<Uuid>>,
}

impl SportEquipmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.type_id.is_none()
            && self.sport_id.is_none()
    }
}

pub type SportEquipmentTypePublic = SportEquipmentType;
pub type SportEquipmentTypesPublic = Page<SportEquipmentTypePublic>;
pub type SportEquipmentPublic = SportEquipment;
pub type SportEquipmentsPublic = Page<SportEquipmentPublic>;

impl SportEquipmentType {
    pub async fn create(pool: &PgPool, data: SportEquipmentTypeCreate) -> Result<Self, sqlx::Error> {
        let equipment_type = sqlx::query_as::<_, SportEquipmentType>(
            r#"
            INSERT INTO sport_equipment_type (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(equipment_type)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let equipment_type = sqlx::query_as::<_, SportEquipmentType>(
            "SELECT id, name, description FROM sport_equipment_type WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(equipment_type)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: SportEquipmentTypeUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        // COALESCE keeps the stored value for absent fields; neither column is nullable
        let equipment_type = sqlx::query_as::<_, SportEquipmentType>(
            r#"
            UPDATE sport_equipment_type
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(equipment_type)
    }

    /// Deletes an equipment type; equipment of that type becomes untyped
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sport_equipment_type WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let types = sqlx::query_as::<_, SportEquipmentType>(
            r#"
            SELECT id, name, description
            FROM sport_equipment_type
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(types)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sport_equipment_type")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn page(
        pool: &PgPool,
        params: ListParams,
    ) -> Result<SportEquipmentTypesPublic, sqlx::Error> {
        let types = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(types, count))
    }
}

impl SportEquipment {
    pub async fn create(pool: &PgPool, data: SportEquipmentCreate) -> Result<Self, sqlx::Error> {
        let equipment = sqlx::query_as::<_, SportEquipment>(
            r#"
            INSERT INTO sport_equipment (id, name, description, type_id, sport_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, type_id, sport_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.description)
        .bind(data.type_id)
        .bind(data.sport_id)
        .fetch_one(pool)
        .await?;

        Ok(equipment)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let equipment = sqlx::query_as::<_, SportEquipment>(
            "SELECT id, name, description, type_id, sport_id FROM sport_equipment WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(equipment)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: SportEquipmentUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE sport_equipment SET ");
        let mut set = query.separated(", ");

        if let Some(name) = data.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = data.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(type_id) = data.type_id {
            set.push("type_id = ").push_bind_unseparated(type_id);
        }
        if let Some(sport_id) = data.sport_id {
            set.push("sport_id = ").push_bind_unseparated(sport_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING id, name, description, type_id, sport_id");

        let equipment = query
            .build_query_as::<SportEquipment>()
            .fetch_optional(pool)
            .await?;

        Ok(equipment)
    }

    /// Deletes a piece of equipment
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation while a match still reserves it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sport_equipment WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let equipment = sqlx::query_as::<_, SportEquipment>(
            r#"
            SELECT id, name, description, type_id, sport_id
            FROM sport_equipment
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(equipment)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sport_equipment")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn page(pool: &PgPool, params: ListParams) -> Result<SportEquipmentsPublic, sqlx::Error> {
        let equipment = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(equipment, count))
    }

    /// Equipment of one type, ordered by name
    pub async fn list_by_type(pool: &PgPool, type_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let equipment = sqlx::query_as::<_, SportEquipment>(
            r#"
            SELECT id, name, description, type_id, sport_id
            FROM sport_equipment
            WHERE type_id = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(type_id)
        .fetch_all(pool)
        .await?;

        Ok(equipment)
    }

    /// Equipment a sport needs, ordered by name
    pub async fn list_by_sport(pool: &PgPool, sport_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let equipment = sqlx::query_as::<_, SportEquipment>(
            r#"
            SELECT id, name, description, type_id, sport_id
            FROM sport_equipment
            WHERE sport_id = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(sport_id)
        .fetch_all(pool)
        .await?;

        Ok(equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_type_requires_description() {
        let parsed = serde_json::from_str::<SportEquipmentTypeCreate>(r#"{"name": "Ball"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_equipment_bounds() {
        let create = SportEquipmentCreate {
            name: "Size 5 football".to_string(),
            description: "d".repeat(256),
            type_id: None,
            sport_id: None,
        };

        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_equipment_update_detach_from_sport() {
        let update: SportEquipmentUpdate = serde_json::from_str(r#"{"sport_id": null}"#).unwrap();
        assert_eq!(update.sport_id, Some(None));
        assert_eq!(update.type_id, None);
        assert!(!update.is_empty());
    }
}
