/// Tournament model, transfer shapes and database operations
///
/// A tournament is a sport event at a location within an optional time
/// window. Teams are entered through `team.tournament_id`; individual players
/// are linked through `tournament_player`. Deleting a tournament deletes its
/// matches and player links and withdraws its teams.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tournament (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     sport_id UUID REFERENCES sport (id) ON DELETE SET NULL,
///     location VARCHAR(255) NOT NULL,
///     datetime_begin TIMESTAMPTZ,
///     datetime_end TIMESTAMPTZ,
///     num_teams INTEGER NOT NULL DEFAULT 0,
///     description VARCHAR(1000),
///     organizer_id UUID REFERENCES "user" (id)
/// );
///
/// CREATE TABLE tournament_player (
///     tournament_id UUID NOT NULL REFERENCES tournament (id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES "user" (id) ON DELETE CASCADE,
///     PRIMARY KEY (tournament_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use birthday_shared::models::tournament::{Tournament, TournamentCreate};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, organizer: Uuid, player: Uuid) -> Result<(), sqlx::Error> {
/// let tournament = Tournament::create(&pool, TournamentCreate {
///     name: "Summer Cup".to_string(),
///     location: "Riverside Park".to_string(),
///     ..Default::default()
/// }, Some(organizer)).await?;
///
/// Tournament::add_player(&pool, tournament.id, player).await?;
/// let players = Tournament::players(&pool, tournament.id).await?;
/// # Ok(())
/// # }
/// ```

use super::matches::Match;
use super::team::Team;
use super::user::{User, UserPublic};
use super::{double_option, ListParams, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

/// Tournament row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub sport_id: Option<Uuid>,
    pub location: String,
    pub datetime_begin: Option<DateTime<Utc>>,
    pub datetime_end: Option<DateTime<Utc>>,

    /// Planned number of teams
    pub num_teams: i32,

    pub description: Option<String>,

    /// User who set the tournament up
    pub organizer_id: Option<Uuid>,
}

/// Tournament creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TournamentCreate {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,

    #[serde(default)]
    pub sport_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: String,

    #[serde(default)]
    pub datetime_begin: Option<DateTime<Utc>>,

    #[serde(default)]
    pub datetime_end: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub num_teams: i32,
}

/// Tournament update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TournamentUpdate {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub sport_id: Option<Option<Uuid>>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub datetime_begin: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option")]
    pub datetime_end: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,

    #[serde(default)]
    pub num_teams: Option<i32>,
}

impl TournamentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sport_id.is_none()
            && self.location.is_none()
            && self.datetime_begin.is_none()
            && self.datetime_end.is_none()
            && self.description.is_none()
            && self.num_teams.is_none()
    }
}

/// Tournament as returned by the API
///
/// The planned team count is internal and not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentPublic {
    pub id: Uuid,

    /// `None` once the tournament was created without an organizer
    pub organizer_id: Option<Uuid>,

    pub name: String,
    pub sport_id: Option<Uuid>,
    pub location: String,
    pub datetime_begin: Option<DateTime<Utc>>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl From<Tournament> for TournamentPublic {
    fn from(tournament: Tournament) -> Self {
        Self {
            id: tournament.id,
            organizer_id: tournament.organizer_id,
            name: tournament.name,
            sport_id: tournament.sport_id,
            location: tournament.location,
            datetime_begin: tournament.datetime_begin,
            datetime_end: tournament.datetime_end,
            description: tournament.description,
        }
    }
}

/// One page of tournaments
pub type TournamentsPublic = Page<TournamentPublic>;

impl Tournament {
    /// Inserts a tournament organized by `organizer_id`
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the sport or organizer doesn't exist.
    pub async fn create(
        pool: &PgPool,
        data: TournamentCreate,
        organizer_id: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournament (id, name, sport_id, location, datetime_begin, datetime_end,
                                    num_teams, description, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, sport_id, location, datetime_begin, datetime_end,
                      num_teams, description, organizer_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(data.sport_id)
        .bind(data.location)
        .bind(data.datetime_begin)
        .bind(data.datetime_end)
        .bind(data.num_teams)
        .bind(data.description)
        .bind(organizer_id)
        .fetch_one(pool)
        .await?;

        Ok(tournament)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT id, name, sport_id, location, datetime_begin, datetime_end,
                   num_teams, description, organizer_id
            FROM tournament
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tournament)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: TournamentUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE tournament SET ");
        let mut set = query.separated(", ");

        if let Some(name) = data.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(sport_id) = data.sport_id {
            set.push("sport_id = ").push_bind_unseparated(sport_id);
        }
        if let Some(location) = data.location {
            set.push("location = ").push_bind_unseparated(location);
        }
        if let Some(datetime_begin) = data.datetime_begin {
            set.push("datetime_begin = ").push_bind_unseparated(datetime_begin);
        }
        if let Some(datetime_end) = data.datetime_end {
            set.push("datetime_end = ").push_bind_unseparated(datetime_end);
        }
        if let Some(description) = data.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(num_teams) = data.num_teams {
            set.push("num_teams = ").push_bind_unseparated(num_teams);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            " RETURNING id, name, sport_id, location, datetime_begin, datetime_end, \
             num_teams, description, organizer_id",
        );

        let tournament = query
            .build_query_as::<Tournament>()
            .fetch_optional(pool)
            .await?;

        Ok(tournament)
    }

    /// Deletes a tournament together with its matches and player links
    ///
    /// Entered teams are kept and withdrawn.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tournament WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tournaments, earliest start first (unscheduled last)
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT id, name, sport_id, location, datetime_begin, datetime_end,
                   num_teams, description, organizer_id
            FROM tournament
            ORDER BY datetime_begin ASC NULLS LAST, name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(tournaments)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tournament")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn page(pool: &PgPool, params: ListParams) -> Result<TournamentsPublic, sqlx::Error> {
        let tournaments = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(tournaments, count))
    }

    /// Teams entered into the tournament
    pub async fn teams(pool: &PgPool, id: Uuid) -> Result<Vec<Team>, sqlx::Error> {
        Team::list_by_tournament(pool, id).await
    }

    /// Enters a team, moving it out of any other tournament
    ///
    /// Returns false if the team doesn't exist.
    pub async fn add_team(pool: &PgPool, id: Uuid, team_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE team SET tournament_id = $1 WHERE id = $2")
            .bind(id)
            .bind(team_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Withdraws a team; false if it wasn't entered
    pub async fn remove_team(pool: &PgPool, id: Uuid, team_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE team SET tournament_id = NULL WHERE id = $1 AND tournament_id = $2",
        )
        .bind(team_id)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Players taking part, ordered by email
    pub async fn players(pool: &PgPool, id: Uuid) -> Result<Vec<UserPublic>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.is_active, u.is_superuser, u.first_name, u.last_name,
                   u.birthdate, u.phone_number, u.hashed_password, u.team_id
            FROM "user" u
            JOIN tournament_player tp ON tp.user_id = u.id
            WHERE tp.tournament_id = $1
            ORDER BY u.email ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(users.into_iter().map(UserPublic::from).collect())
    }

    /// Registers a player
    ///
    /// Returns false if the player was already registered.
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the tournament or user doesn't exist.
    pub async fn add_player(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO tournament_player (tournament_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (tournament_id, user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unregisters a player; false if they weren't registered
    pub async fn remove_player(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM tournament_player WHERE tournament_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Matches of the tournament by round and time
    pub async fn matches(pool: &PgPool, id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
        Match::list_by_tournament(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tournament_create_from_json() {
        let create: TournamentCreate = serde_json::from_str(
            r#"{
                "name": "Summer Cup",
                "location": "Riverside Park",
                "datetime_begin": "2026-07-01T09:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(
            create.datetime_begin,
            Some(Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap())
        );
        assert!(create.datetime_end.is_none());
        assert_eq!(create.num_teams, 0);
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_tournament_location_is_required() {
        let parsed = serde_json::from_str::<TournamentCreate>(r#"{"name": "Summer Cup"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_tournament_description_limit() {
        let create = TournamentCreate {
            name: "Summer Cup".to_string(),
            location: "Riverside Park".to_string(),
            description: Some("d".repeat(1001)),
            ..Default::default()
        };
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));

        let update = TournamentUpdate {
            description: Some(Some("d".repeat(1000))),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_tournament_public_hides_team_count() {
        let organizer = Uuid::new_v4();
        let tournament = Tournament {
            id: Uuid::new_v4(),
            name: "Summer Cup".to_string(),
            sport_id: None,
            location: "Riverside Park".to_string(),
            datetime_begin: None,
            datetime_end: None,
            num_teams: 8,
            description: Some("Bring cake".to_string()),
            organizer_id: Some(organizer),
        };

        let public = TournamentPublic::from(tournament.clone());
        assert_eq!(public.id, tournament.id);
        assert_eq!(public.organizer_id, Some(organizer));

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("num_teams").is_none());
        assert_eq!(json["organizer_id"], organizer.to_string());
        assert_eq!(json["description"], "Bring cake");
    }

    #[test]
    fn test_tournament_update_reschedule() {
        let update: TournamentUpdate =
            serde_json::from_str(r#"{"datetime_end": null, "num_teams": 8}"#).unwrap();

        assert_eq!(update.datetime_end, Some(None));
        assert_eq!(update.datetime_begin, None);
        assert_eq!(update.num_teams, Some(8));
        assert!(!update.is_empty());
    }
}
