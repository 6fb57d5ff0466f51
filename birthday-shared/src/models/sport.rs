/// Sport model
///
/// The equipment a sport needs is the set of `sport_equipment` rows whose
/// `sport_id` points at it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sport (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL
/// );
/// ```

use super::equipment::SportEquipment;
use super::{ListParams, Page};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Sport row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sport {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SportCreate {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SportUpdate {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

pub type SportPublic = Sport;
pub type SportsPublic = Page<SportPublic>;

/// Sport together with the equipment it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportDetail {
    #[serde(flatten)]
    pub sport: Sport,

    pub sport_equipment_needed: Vec<SportEquipment>,
}

impl Sport {
    pub async fn create(pool: &PgPool, data: SportCreate) -> Result<Self, sqlx::Error> {
        let sport = sqlx::query_as::<_, Sport>(
            "INSERT INTO sport (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(sport)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sport = sqlx::query_as::<_, Sport>("SELECT id, name FROM sport WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(sport)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: SportUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sport = sqlx::query_as::<_, Sport>(
            r#"
            UPDATE sport
            SET name = COALESCE($2, name)
            WHERE id = $1
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await?;

        Ok(sport)
    }

    /// Deletes a sport
    ///
    /// Equipment it needed and tournaments of that sport are kept with their
    /// `sport_id` cleared.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sport WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let sports = sqlx::query_as::<_, Sport>(
            r#"
            SELECT id, name
            FROM sport
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(sports)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sport")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn page(pool: &PgPool, params: ListParams) -> Result<SportsPublic, sqlx::Error> {
        let sports = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(sports, count))
    }

    /// Equipment this sport needs
    pub async fn equipment_needed(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Vec<SportEquipment>, sqlx::Error> {
        SportEquipment::list_by_sport(pool, id).await
    }

    /// Loads a sport with its equipment; `None` if the sport doesn't exist
    pub async fn detail(pool: &PgPool, id: Uuid) -> Result<Option<SportDetail>, sqlx::Error> {
        let Some(sport) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let sport_equipment_needed = Self::equipment_needed(pool, id).await?;

        Ok(Some(SportDetail {
            sport,
            sport_equipment_needed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_detail_is_flat_json() {
        let sport = Sport {
            id: Uuid::new_v4(),
            name: "Football".to_string(),
        };
        let detail = SportDetail {
            sport: sport.clone(),
            sport_equipment_needed: vec![],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Football");
        assert_eq!(json["id"], sport.id.to_string());
        assert!(json["sport_equipment_needed"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_sport_name_max_length() {
        let create = SportCreate {
            name: "s".repeat(256),
        };
        assert!(create.validate().is_err());
        assert!(SportUpdate::default().validate().is_ok());
    }
}
