/// Match model
///
/// One game of a tournament between two teams. Matches are deleted together
/// with their tournament. The table name is a reserved word and is always
/// quoted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE "match" (
///     id UUID PRIMARY KEY,
///     tournament_id UUID NOT NULL REFERENCES tournament (id) ON DELETE CASCADE,
///     round_number INTEGER NOT NULL DEFAULT 1,
///     time TIMESTAMPTZ,
///     team1_id UUID REFERENCES team (id),
///     team2_id UUID REFERENCES team (id),
///     team1_score INTEGER NOT NULL DEFAULT 0,
///     team2_score INTEGER NOT NULL DEFAULT 0,
///     winner_id UUID REFERENCES team (id),
///     reserved_equipment_id UUID REFERENCES sport_equipment (id)
/// );
/// ```

use super::{double_option, ListParams, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

const MATCH_COLUMNS: &str = "id, tournament_id, round_number, time, team1_id, team2_id, \
                             team1_score, team2_score, winner_id, reserved_equipment_id";

/// Match row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub round_number: i32,
    pub time: Option<DateTime<Utc>>,
    pub team1_id: Option<Uuid>,
    pub team2_id: Option<Uuid>,
    pub team1_score: i32,
    pub team2_score: i32,
    pub winner_id: Option<Uuid>,

    /// Equipment booked for the match
    pub reserved_equipment_id: Option<Uuid>,
}

/// Match creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchCreate {
    pub tournament_id: Uuid,

    #[serde(default = "default_round_number")]
    pub round_number: i32,

    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub team1_id: Option<Uuid>,

    #[serde(default)]
    pub team2_id: Option<Uuid>,

    #[serde(default)]
    pub team1_score: i32,

    #[serde(default)]
    pub team2_score: i32,

    #[serde(default)]
    pub winner_id: Option<Uuid>,

    #[serde(default)]
    pub reserved_equipment_id: Option<Uuid>,
}

impl MatchCreate {
    /// Unscheduled first-round match of a tournament
    pub fn new(tournament_id: Uuid) -> Self {
        Self {
            tournament_id,
            round_number: default_round_number(),
            time: None,
            team1_id: None,
            team2_id: None,
            team1_score: 0,
            team2_score: 0,
            winner_id: None,
            reserved_equipment_id: None,
        }
    }
}

fn default_round_number() -> i32 {
    1
}

/// Match update request
///
/// Nullable references take `null` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchUpdate {
    #[serde(default)]
    pub tournament_id: Option<Uuid>,

    #[serde(default)]
    pub round_number: Option<i32>,

    #[serde(default, deserialize_with = "double_option")]
    pub time: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option")]
    pub team1_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub team2_id: Option<Option<Uuid>>,

    #[serde(default)]
    pub team1_score: Option<i32>,

    #[serde(default)]
    pub team2_score: Option<i32>,

    #[serde(default, deserialize_with = "double_option")]
    pub winner_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub reserved_equipment_id: Option<Option<Uuid>>,
}

impl MatchUpdate {
    pub fn is_empty(&self) -> bool {
        self.tournament_id.is_none()
            && self.round_number.is_none()
            && self.time.is_none()
            && self.team1_id.is_none()
            && self.team2_id.is_none()
            && self.team1_score.is_none()
            && self.team2_score.is_none()
            && self.winner_id.is_none()
            && self.reserved_equipment_id.is_none()
    }
}

pub type MatchPublic = Match;
pub type MatchesPublic = Page<MatchPublic>;

impl Match {
    /// Inserts a match
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the tournament, a team or the
    /// reserved equipment doesn't exist.
    pub async fn create(pool: &PgPool, data: MatchCreate) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO "match" ({MATCH_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MATCH_COLUMNS}
            "#
        );

        let game = sqlx::query_as::<_, Match>(&query)
            .bind(Uuid::new_v4())
            .bind(data.tournament_id)
            .bind(data.round_number)
            .bind(data.time)
            .bind(data.team1_id)
            .bind(data.team2_id)
            .bind(data.team1_score)
            .bind(data.team2_score)
            .bind(data.winner_id)
            .bind(data.reserved_equipment_id)
            .fetch_one(pool)
            .await?;

        Ok(game)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(r#"SELECT {MATCH_COLUMNS} FROM "match" WHERE id = $1"#);

        let game = sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(game)
    }

    /// Applies an update; `None` if the match doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: MatchUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new(r#"UPDATE "match" SET "#);
        let mut set = query.separated(", ");

        if let Some(tournament_id) = data.tournament_id {
            set.push("tournament_id = ").push_bind_unseparated(tournament_id);
        }
        if let Some(round_number) = data.round_number {
            set.push("round_number = ").push_bind_unseparated(round_number);
        }
        if let Some(time) = data.time {
            set.push("time = ").push_bind_unseparated(time);
        }
        if let Some(team1_id) = data.team1_id {
            set.push("team1_id = ").push_bind_unseparated(team1_id);
        }
        if let Some(team2_id) = data.team2_id {
            set.push("team2_id = ").push_bind_unseparated(team2_id);
        }
        if let Some(team1_score) = data.team1_score {
            set.push("team1_score = ").push_bind_unseparated(team1_score);
        }
        if let Some(team2_score) = data.team2_score {
            set.push("team2_score = ").push_bind_unseparated(team2_score);
        }
        if let Some(winner_id) = data.winner_id {
            set.push("winner_id = ").push_bind_unseparated(winner_id);
        }
        if let Some(reserved_equipment_id) = data.reserved_equipment_id {
            set.push("reserved_equipment_id = ")
                .push_bind_unseparated(reserved_equipment_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(MATCH_COLUMNS);

        let game = query.build_query_as::<Match>().fetch_optional(pool).await?;

        Ok(game)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "match" WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All matches of a tournament by round, then kick-off time
    pub async fn list_by_tournament(
        pool: &PgPool,
        tournament_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM "match"
            WHERE tournament_id = $1
            ORDER BY round_number ASC, time ASC NULLS LAST, id ASC
            "#
        );

        let games = sqlx::query_as::<_, Match>(&query)
            .bind(tournament_id)
            .fetch_all(pool)
            .await?;

        Ok(games)
    }

    pub async fn count_by_tournament(pool: &PgPool, tournament_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM "match" WHERE tournament_id = $1"#)
                .bind(tournament_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// One page of a tournament's matches
    pub async fn page_by_tournament(
        pool: &PgPool,
        tournament_id: Uuid,
        params: ListParams,
    ) -> Result<MatchesPublic, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM "match"
            WHERE tournament_id = $1
            ORDER BY round_number ASC, time ASC NULLS LAST, id ASC
            LIMIT $2 OFFSET $3
            "#
        );

        let games = sqlx::query_as::<_, Match>(&query)
            .bind(tournament_id)
            .bind(params.row_limit())
            .bind(params.row_offset())
            .fetch_all(pool)
            .await?;
        let count = Self::count_by_tournament(pool, tournament_id).await?;

        Ok(Page::from_rows(games, count))
    }
}
