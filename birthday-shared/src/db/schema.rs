/// Schema registration
///
/// Registers every table declared by the `models` modules. Registration is
/// idempotent (`CREATE TABLE IF NOT EXISTS`) and runs in a single transaction,
/// so a half-created schema is never left behind.
///
/// # Reference cycle
///
/// `user.team_id -> team`, `team.tournament_id -> tournament` and
/// `tournament.organizer_id -> user` form a cycle. The tournament table is
/// created without its organizer constraint, which is attached once `user`
/// exists.
///
/// # Delete rules
///
/// - `item.owner_id`, `match.tournament_id` and both sides of
///   `tournament_player` cascade.
/// - Memberships (`user.team_id`, `team.tournament_id`) and classifications
///   (`tournament.sport_id`, `sport_equipment.sport_id`,
///   `sport_equipment.type_id`) are cleared when the parent goes.
/// - Match participants, winner, reserved equipment and the tournament
///   organizer block the delete of the row they reference.
///
/// # Example
///
/// ```no_run
/// use birthday_shared::db::pool::{create_pool, DatabaseConfig};
/// use birthday_shared::db::schema::{create_all, registered_tables};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::from_env()?).await?;
/// create_all(&pool).await?;
///
/// let tables = registered_tables(&pool).await?;
/// println!("Registered: {:?}", tables);
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Every table of the data layer, in creation order
pub const TABLES: [&str; 9] = [
    "sport_equipment_type",
    "sport",
    "sport_equipment",
    "tournament",
    "team",
    "user",
    "item",
    "tournament_player",
    "match",
];

const CREATE_STATEMENTS: [&str; 13] = [
    r#"
    CREATE TABLE IF NOT EXISTS sport_equipment_type (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sport (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sport_equipment (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description VARCHAR(255) NOT NULL,
        type_id UUID REFERENCES sport_equipment_type (id) ON DELETE SET NULL,
        sport_id UUID REFERENCES sport (id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tournament (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        sport_id UUID REFERENCES sport (id) ON DELETE SET NULL,
        location VARCHAR(255) NOT NULL,
        datetime_begin TIMESTAMPTZ,
        datetime_end TIMESTAMPTZ,
        num_teams INTEGER NOT NULL DEFAULT 0,
        description VARCHAR(1000),
        organizer_id UUID
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        size INTEGER NOT NULL DEFAULT 0,
        tournament_id UUID REFERENCES tournament (id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "user" (
        id UUID PRIMARY KEY,
        email VARCHAR(255) NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        first_name VARCHAR(255),
        last_name VARCHAR(255),
        birthdate DATE,
        phone_number VARCHAR(15),
        hashed_password VARCHAR NOT NULL,
        team_id UUID REFERENCES team (id) ON DELETE SET NULL
    )
    "#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS ix_user_email ON "user" (email)"#,
    r#"
    DO $$
    BEGIN
        IF NOT EXISTS (
            SELECT 1 FROM pg_constraint WHERE conname = 'tournament_organizer_id_fkey'
        ) THEN
            ALTER TABLE tournament
                ADD CONSTRAINT tournament_organizer_id_fkey
                FOREIGN KEY (organizer_id) REFERENCES "user" (id);
        END IF;
    END
    $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description VARCHAR(255),
        owner_id UUID NOT NULL REFERENCES "user" (id) ON DELETE CASCADE
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS ix_item_owner_id ON item (owner_id)"#,
    r#"
    CREATE TABLE IF NOT EXISTS tournament_player (
        tournament_id UUID NOT NULL REFERENCES tournament (id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES "user" (id) ON DELETE CASCADE,
        PRIMARY KEY (tournament_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "match" (
        id UUID PRIMARY KEY,
        tournament_id UUID NOT NULL REFERENCES tournament (id) ON DELETE CASCADE,
        round_number INTEGER NOT NULL DEFAULT 1,
        time TIMESTAMPTZ,
        team1_id UUID REFERENCES team (id),
        team2_id UUID REFERENCES team (id),
        team1_score INTEGER NOT NULL DEFAULT 0,
        team2_score INTEGER NOT NULL DEFAULT 0,
        winner_id UUID REFERENCES team (id),
        reserved_equipment_id UUID REFERENCES sport_equipment (id)
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS ix_match_tournament_id ON "match" (tournament_id)"#,
];

const DROP_STATEMENT: &str = r#"
    DROP TABLE IF EXISTS
        "match", tournament_player, item, "user", team, tournament,
        sport_equipment, sport, sport_equipment_type
    CASCADE
"#;

/// Registers every table, index and constraint of the data layer
///
/// Safe to call on every startup; existing tables are left untouched.
///
/// # Errors
///
/// Returns an error if any statement fails. The transaction is rolled back and
/// no partial schema remains.
pub async fn create_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!(tables = TABLES.len(), "Registering database schema");

    let mut tx = pool.begin().await?;
    for (index, statement) in CREATE_STATEMENTS.iter().enumerate() {
        debug!(statement = index, "Executing schema statement");
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema registered");
    Ok(())
}

/// Drops every table of the data layer (and all of its rows)
///
/// Intended for tests and local development only.
pub async fn drop_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    warn!("Dropping all data layer tables");
    sqlx::query(DROP_STATEMENT).execute(pool).await?;
    Ok(())
}

/// Checks whether `table` exists in the current schema
pub async fn table_exists(pool: &PgPool, table: &str) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Lists the data layer tables that currently exist, in creation order
pub async fn registered_tables(pool: &PgPool) -> Result<Vec<&'static str>, sqlx::Error> {
    let existing: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT table_name::TEXT
        FROM information_schema.tables
        WHERE table_schema = current_schema()
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(TABLES
        .iter()
        .copied()
        .filter(|table| existing.iter().any(|name| name == table))
        .collect())
}

/// Creates the database named in `database_url` if it does not exist yet
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
    } else {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_has_a_create_statement() {
        for table in TABLES {
            let quoted = format!("\"{}\"", table);
            let found = CREATE_STATEMENTS.iter().any(|statement| {
                statement.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table))
                    || statement.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", quoted))
            });
            assert!(found, "no CREATE TABLE for {}", table);
        }
    }

    #[test]
    fn test_drop_statement_covers_every_table() {
        for table in TABLES {
            assert!(DROP_STATEMENT.contains(table), "{} is not dropped", table);
        }
    }

    #[test]
    fn test_cascade_rules_are_declared() {
        let item = CREATE_STATEMENTS
            .iter()
            .find(|s| s.contains("CREATE TABLE IF NOT EXISTS item"))
            .unwrap();
        assert!(item.contains(r#"owner_id UUID NOT NULL REFERENCES "user" (id) ON DELETE CASCADE"#));

        let matches = CREATE_STATEMENTS
            .iter()
            .find(|s| s.contains(r#"CREATE TABLE IF NOT EXISTS "match""#))
            .unwrap();
        assert!(matches
            .contains("tournament_id UUID NOT NULL REFERENCES tournament (id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_membership_references_are_cleared_on_delete() {
        let all = CREATE_STATEMENTS.concat();
        for reference in [
            "type_id UUID REFERENCES sport_equipment_type (id) ON DELETE SET NULL",
            "sport_id UUID REFERENCES sport (id) ON DELETE SET NULL",
            "tournament_id UUID REFERENCES tournament (id) ON DELETE SET NULL",
            "team_id UUID REFERENCES team (id) ON DELETE SET NULL",
        ] {
            assert!(all.contains(reference), "missing {}", reference);
        }

        let matches = CREATE_STATEMENTS
            .iter()
            .find(|s| s.contains(r#"CREATE TABLE IF NOT EXISTS "match""#))
            .unwrap();
        assert!(matches.contains("winner_id UUID REFERENCES team (id),"));
        assert!(!matches.contains("SET NULL"));
    }
}
