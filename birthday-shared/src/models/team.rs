/// Team model, transfer shapes and database operations
///
/// Players are the users whose `team_id` points at the team. A team can be
/// entered into one tournament at a time through `tournament_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     size INTEGER NOT NULL DEFAULT 0,
///     tournament_id UUID REFERENCES tournament (id) ON DELETE SET NULL
/// );
/// ```
///
/// `size` is the declared roster size. It is stored as given and is not
/// recomputed from the player list.

use super::user::{User, UserPublic};
use super::{double_option, ListParams, Page};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

/// Team row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub size: i32,
    pub tournament_id: Option<Uuid>,
}

/// Team creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamCreate {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,

    #[serde(default)]
    pub size: i32,

    #[serde(default)]
    pub tournament_id: Option<Uuid>,
}

/// Team update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TeamUpdate {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    pub size: Option<i32>,

    /// `null` withdraws the team from its tournament
    #[serde(default, deserialize_with = "double_option")]
    pub tournament_id: Option<Option<Uuid>>,
}

impl TeamUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.size.is_none() && self.tournament_id.is_none()
    }
}

/// The row is already the public shape
pub type TeamPublic = Team;

/// One page of teams
pub type TeamsPublic = Page<TeamPublic>;

impl Team {
    pub async fn create(pool: &PgPool, data: TeamCreate) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO team (id, name, size, tournament_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, size, tournament_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.size)
        .bind(data.tournament_id)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT id, name, size, tournament_id FROM team WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: TeamUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE team SET ");
        let mut set = query.separated(", ");

        if let Some(name) = data.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(size) = data.size {
            set.push("size = ").push_bind_unseparated(size);
        }
        if let Some(tournament_id) = data.tournament_id {
            set.push("tournament_id = ").push_bind_unseparated(tournament_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING id, name, size, tournament_id");

        let team = query.build_query_as::<Team>().fetch_optional(pool).await?;

        Ok(team)
    }

    /// Deletes a team; its players stay, without a team
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation while matches still reference it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, size, tournament_id
            FROM team
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM team")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn page(pool: &PgPool, params: ListParams) -> Result<TeamsPublic, sqlx::Error> {
        let teams = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(teams, count))
    }

    /// Teams entered into a tournament, ordered by name
    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, size, tournament_id
            FROM team
            WHERE tournament_id = $1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Players of a team in their public shape
    pub async fn players(pool: &PgPool, id: Uuid) -> Result<Vec<UserPublic>, sqlx::Error> {
        let users = User::list_by_team(pool, id).await?;

        Ok(users.into_iter().map(UserPublic::from).collect())
    }

    /// Puts a user on this team, moving them off any previous team
    ///
    /// Returns false if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the team doesn't exist.
    pub async fn add_player(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"UPDATE "user" SET team_id = $1 WHERE id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Takes a user off this team
    ///
    /// Returns false if the user wasn't a player of this team.
    pub async fn remove_player(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query(r#"UPDATE "user" SET team_id = NULL WHERE id = $1 AND team_id = $2"#)
                .bind(user_id)
                .bind(id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
