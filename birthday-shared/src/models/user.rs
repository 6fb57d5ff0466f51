/// User model, transfer shapes and database operations
///
/// A user owns items (deleted with the user), can be the player of one team
/// and can take part in any number of tournaments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE "user" (
///     id UUID PRIMARY KEY,
///     email VARCHAR(255) NOT NULL,            -- unique index ix_user_email
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     first_name VARCHAR(255),
///     last_name VARCHAR(255),
///     birthdate DATE,
///     phone_number VARCHAR(15),
///     hashed_password VARCHAR NOT NULL,
///     team_id UUID REFERENCES team (id) ON DELETE SET NULL
/// );
/// ```
///
/// Passwords never reach this module in plaintext: the request shapes carry
/// the password for validation only, and the caller hands a finished hash to
/// [`UserCreate::into_new_user`] or [`UserUpdate::into_changes`].
///
/// # Example
///
/// ```no_run
/// use birthday_shared::models::user::{User, UserRegister};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let register = UserRegister {
///     email: "ada@example.com".to_string(),
///     password: "correct horse".to_string(),
///     first_name: Some("Ada".to_string()),
///     last_name: None,
/// };
///
/// let user = User::create(&pool, register.into_new_user("$argon2id$...".to_string())).await?;
/// let found = User::find_by_email(&pool, "ada@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use super::{default_true, double_option, ListParams, Page};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lowercases the domain of an address; the local part is kept as given
///
/// Every email is stored and looked up in this form, so `ada@Example.COM`
/// and `ada@example.com` are the same account.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Rejects domains without a dot, such as `ada@localhost`
fn email_domain_has_dot(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map_or("", |(_, domain)| domain);

    if domain.contains('.') && domain.split('.').all(|label| !label.is_empty()) {
        Ok(())
    } else {
        Err(ValidationError::new("email_domain"))
    }
}

/// User row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Inactive users keep their data but are not allowed to log in
    pub is_active: bool,

    /// Superusers may manage every other user
    pub is_superuser: bool,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub birthdate: Option<NaiveDate>,

    /// Up to 15 characters (E.164 length)
    pub phone_number: Option<String>,

    /// Password hash; never serialized
    #[serde(skip_serializing, default)]
    pub hashed_password: String,

    /// Team this user plays for
    pub team_id: Option<Uuid>,
}

/// Row to insert
///
/// Built from [`UserCreate`] or [`UserRegister`] once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub hashed_password: String,
    pub team_id: Option<Uuid>,
}

/// Columns to change
///
/// `None` leaves a column alone. Nullable columns use `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub phone_number: Option<Option<String>>,
    pub hashed_password: Option<String>,
    pub team_id: Option<Option<Uuid>>,
}

impl UserChanges {
    /// True when nothing would be written
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.is_active.is_none()
            && self.is_superuser.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.birthdate.is_none()
            && self.phone_number.is_none()
            && self.hashed_password.is_none()
            && self.team_id.is_none()
    }
}

/// Account creation by an administrator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "email_domain_has_dot", message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_superuser: bool,

    #[serde(default)]
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<String>,

    #[serde(default)]
    pub birthdate: Option<NaiveDate>,

    #[serde(default)]
    #[validate(length(max = 15, message = "Phone number must be at most 15 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub password: String,
}

impl Default for UserCreate {
    fn default() -> Self {
        Self {
            email: String::new(),
            is_active: true,
            is_superuser: false,
            first_name: None,
            last_name: None,
            birthdate: None,
            phone_number: None,
            password: String::new(),
        }
    }
}

impl UserCreate {
    /// Pairs the validated shape with the hash of `self.password`
    pub fn into_new_user(self, hashed_password: String) -> NewUser {
        NewUser {
            email: normalize_email(&self.email),
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            phone_number: self.phone_number,
            hashed_password,
            team_id: None,
        }
    }
}

/// Self-service sign-up
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserRegister {
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "email_domain_has_dot", message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<String>,
}

impl UserRegister {
    /// Registered users start active and without superuser rights
    pub fn into_new_user(self, hashed_password: String) -> NewUser {
        NewUser {
            email: normalize_email(&self.email),
            is_active: true,
            is_superuser: false,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: None,
            phone_number: None,
            hashed_password,
            team_id: None,
        }
    }
}

/// Administrative update; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[serde(default)]
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "email_domain_has_dot", message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub is_superuser: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub birthdate: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 15, message = "Phone number must be at most 15 characters"))]
    pub phone_number: Option<Option<String>>,

    #[serde(default)]
    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub password: Option<String>,
}

impl UserUpdate {
    /// Converts to column changes; `hashed_password` replaces `self.password`
    pub fn into_changes(self, hashed_password: Option<String>) -> UserChanges {
        UserChanges {
            email: self.email.as_deref().map(normalize_email),
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            phone_number: self.phone_number,
            hashed_password,
            team_id: None,
        }
    }
}

/// Profile update by the user themself
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserUpdateMe {
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<Option<String>>,

    #[serde(default)]
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "email_domain_has_dot", message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
}

impl From<UserUpdateMe> for UserChanges {
    fn from(update: UserUpdateMe) -> Self {
        UserChanges {
            email: update.email.as_deref().map(normalize_email),
            first_name: update.first_name,
            last_name: update.last_name,
            ..Default::default()
        }
    }
}

/// Password change by the user themself
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePassword {
    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub new_password: String,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            first_name: user.first_name,
            last_name: user.last_name,
            birthdate: user.birthdate,
            phone_number: user.phone_number,
        }
    }
}

/// One page of users
pub type UsersPublic = Page<UserPublic>;

impl User {
    /// Inserts a user with a fresh UUID
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already registered (unique index `ix_user_email`)
    /// - `team_id` does not reference an existing team
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (id, email, is_active, is_superuser, first_name, last_name,
                                birthdate, phone_number, hashed_password, team_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, email, is_active, is_superuser, first_name, last_name,
                      birthdate, phone_number, hashed_password, team_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email)
        .bind(data.is_active)
        .bind(data.is_superuser)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.birthdate)
        .bind(data.phone_number)
        .bind(data.hashed_password)
        .bind(data.team_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, first_name, last_name,
                   birthdate, phone_number, hashed_password, team_id
            FROM "user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// The domain is matched case-insensitively, the local part exactly.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, first_name, last_name,
                   birthdate, phone_number, hashed_password, team_id
            FROM "user"
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Applies `changes` to a user
    ///
    /// Returns `None` if the user doesn't exist. An empty change set performs
    /// no write and returns the current row.
    ///
    /// # Errors
    ///
    /// Returns an error if the new email belongs to another user, the new
    /// team doesn't exist, or the database connection fails.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        if changes.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new(r#"UPDATE "user" SET "#);
        let mut set = query.separated(", ");

        if let Some(email) = changes.email {
            set.push("email = ").push_bind_unseparated(email);
        }
        if let Some(is_active) = changes.is_active {
            set.push("is_active = ").push_bind_unseparated(is_active);
        }
        if let Some(is_superuser) = changes.is_superuser {
            set.push("is_superuser = ").push_bind_unseparated(is_superuser);
        }
        if let Some(first_name) = changes.first_name {
            set.push("first_name = ").push_bind_unseparated(first_name);
        }
        if let Some(last_name) = changes.last_name {
            set.push("last_name = ").push_bind_unseparated(last_name);
        }
        if let Some(birthdate) = changes.birthdate {
            set.push("birthdate = ").push_bind_unseparated(birthdate);
        }
        if let Some(phone_number) = changes.phone_number {
            set.push("phone_number = ").push_bind_unseparated(phone_number);
        }
        if let Some(hashed_password) = changes.hashed_password {
            set.push("hashed_password = ").push_bind_unseparated(hashed_password);
        }
        if let Some(team_id) = changes.team_id {
            set.push("team_id = ").push_bind_unseparated(team_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(
            " RETURNING id, email, is_active, is_superuser, first_name, last_name, \
             birthdate, phone_number, hashed_password, team_id",
        );

        let user = query.build_query_as::<User>().fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Owned items and tournament participation rows are removed by the
    /// database (`ON DELETE CASCADE`). Returns false if the user didn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the user still organizes a tournament (foreign key
    /// `tournament_organizer_id_fkey`) or the database connection fails.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users ordered by email
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, first_name, last_name,
                   birthdate, phone_number, hashed_password, team_id
            FROM "user"
            ORDER BY email ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.row_limit())
        .bind(params.row_offset())
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// One page of users in their public shape
    pub async fn page(pool: &PgPool, params: ListParams) -> Result<UsersPublic, sqlx::Error> {
        let users = Self::list(pool, params).await?;
        let count = Self::count(pool).await?;

        Ok(Page::from_rows(users, count))
    }

    /// Moves a user onto a team, or off any team with `None`
    ///
    /// Returns `None` if the user doesn't exist.
    pub async fn set_team(
        pool: &PgPool,
        id: Uuid,
        team_id: Option<Uuid>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let changes = UserChanges {
            team_id: Some(team_id),
            ..Default::default()
        };

        Self::update(pool, id, changes).await
    }

    /// Players of a team, ordered by email
    pub async fn list_by_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_superuser, first_name, last_name,
                   birthdate, phone_number, hashed_password, team_id
            FROM "user"
            WHERE team_id = $1
            ORDER BY email ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> UserCreate {
        UserCreate {
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_create_defaults_from_json() {
        let create: UserCreate =
            serde_json::from_str(r#"{"email": "ada@example.com", "password": "correct horse"}"#)
                .unwrap();

        assert!(create.is_active);
        assert!(!create.is_superuser);
        assert!(create.first_name.is_none());
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_user_create_rejects_bad_email() {
        let create = UserCreate {
            email: "not-an-email".to_string(),
            ..valid_create()
        };

        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_email_domain_needs_a_dot() {
        for email in ["ada@localhost", "ada@example.", "ada@.com"] {
            let create = UserCreate {
                email: email.to_string(),
                ..valid_create()
            };
            assert!(create.validate().is_err(), "{email} accepted");
        }

        let update = UserUpdateMe {
            email: Some("ada@localhost".to_string()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let update = UserUpdate {
            email: Some("ada@mail.example.org".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("Ada.Lovelace@Example.COM"), "Ada.Lovelace@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_conversions_store_normalized_email() {
        let create = UserCreate {
            email: "Ada@EXAMPLE.com".to_string(),
            ..valid_create()
        };
        assert_eq!(create.into_new_user("hash".to_string()).email, "Ada@example.com");

        let register = UserRegister {
            email: "eve@Example.Org".to_string(),
            password: "hunter2hunter2".to_string(),
            first_name: None,
            last_name: None,
        };
        assert_eq!(register.into_new_user("hash".to_string()).email, "eve@example.org");

        let update = UserUpdate {
            email: Some("bob@EXAMPLE.NET".to_string()),
            ..Default::default()
        };
        assert_eq!(update.into_changes(None).email.as_deref(), Some("bob@example.net"));

        let me = UserUpdateMe {
            email: Some("Bob@Example.Net".to_string()),
            ..Default::default()
        };
        assert_eq!(UserChanges::from(me).email.as_deref(), Some("Bob@example.net"));
    }

    #[test]
    fn test_password_length_bounds() {
        let short = UserCreate {
            password: "1234567".to_string(),
            ..valid_create()
        };
        assert!(short.validate().is_err());

        let long = UserCreate {
            password: "x".repeat(41),
            ..valid_create()
        };
        assert!(long.validate().is_err());

        let edge = UserCreate {
            password: "x".repeat(40),
            ..valid_create()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_phone_number_max_length() {
        let create = UserCreate {
            phone_number: Some("+1234567890123456".to_string()),
            ..valid_create()
        };

        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone_number"));
    }

    #[test]
    fn test_into_new_user_keeps_profile() {
        let create = UserCreate {
            first_name: Some("Ada".to_string()),
            birthdate: NaiveDate::from_ymd_opt(1815, 12, 10),
            ..valid_create()
        };

        let new_user = create.into_new_user("hash".to_string());
        assert_eq!(new_user.email, "ada@example.com");
        assert_eq!(new_user.first_name.as_deref(), Some("Ada"));
        assert_eq!(new_user.hashed_password, "hash");
        assert!(new_user.is_active);
        assert!(new_user.team_id.is_none());
    }

    #[test]
    fn test_register_cannot_grant_superuser() {
        let register: UserRegister = serde_json::from_str(
            r#"{"email": "eve@example.com", "password": "hunter2hunter2", "is_superuser": true}"#,
        )
        .unwrap();

        let new_user = register.into_new_user("hash".to_string());
        assert!(!new_user.is_superuser);
        assert!(new_user.is_active);
    }

    #[test]
    fn test_user_update_absent_vs_null() {
        let update: UserUpdate =
            serde_json::from_str(r#"{"first_name": null, "is_active": false}"#).unwrap();

        assert_eq!(update.first_name, Some(None));
        assert_eq!(update.last_name, None);
        assert_eq!(update.is_active, Some(false));
        assert!(update.validate().is_ok());

        let changes = update.into_changes(None);
        assert!(changes.hashed_password.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_user_update_validates_present_fields_only() {
        let update = UserUpdate {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        assert!(UserUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_update_me_only_touches_profile() {
        let me = UserUpdateMe {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };

        let changes = UserChanges::from(me);
        assert_eq!(changes.email.as_deref(), Some("new@example.com"));
        assert!(changes.is_superuser.is_none());
        assert!(changes.hashed_password.is_none());
    }

    #[test]
    fn test_empty_changes() {
        assert!(UserChanges::default().is_empty());
    }

    #[test]
    fn test_user_public_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            is_active: true,
            is_superuser: false,
            first_name: None,
            last_name: None,
            birthdate: None,
            phone_number: None,
            hashed_password: "secret-hash".to_string(),
            team_id: None,
        };

        let row_json = serde_json::to_string(&user).unwrap();
        assert!(!row_json.contains("secret-hash"));

        let public = UserPublic::from(user.clone());
        assert_eq!(public.id, user.id);
        let public_json = serde_json::to_value(&public).unwrap();
        assert!(public_json.get("hashed_password").is_none());
    }
}
