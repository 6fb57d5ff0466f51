/// Table models and API transfer shapes
///
/// Every entity module follows the same layout:
///
/// - the table model (`User`, `Item`, ...) deriving `sqlx::FromRow`
/// - `*Create` / `*Update` request shapes deriving `validator::Validate`
/// - a `*Public` response shape and its paged list alias (`UsersPublic`, ...)
/// - CRUD operations as associated functions taking a `&PgPool`
///
/// # Models
///
/// - `user`: accounts; own items, belong to a team, play in tournaments
/// - `item`: owned by a user, deleted with its owner
/// - `team`: named roster of users
/// - `equipment`: equipment types and equipment pieces
/// - `sport`: sport and the equipment it needs
/// - `tournament`: a sport event with teams and players
/// - `matches`: one game of a tournament, deleted with its tournament
/// - `token`: token and message payloads that are never persisted
///
/// # Example
///
/// ```no_run
/// use birthday_shared::models::user::{User, UserCreate};
/// use birthday_shared::models::item::{Item, ItemCreate};
/// use birthday_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::from_env()?).await?;
///
/// let user = User::create(&pool, UserCreate {
///     email: "ada@example.com".to_string(),
///     password: "correct horse".to_string(),
///     ..Default::default()
/// }.into_new_user("$argon2id$...".to_string())).await?;
///
/// let item = Item::create(&pool, ItemCreate {
///     title: "Cake".to_string(),
///     description: None,
/// }, user.id).await?;
/// # Ok(())
/// # }
/// ```

pub mod equipment;
pub mod item;
pub mod matches;
pub mod sport;
pub mod team;
pub mod token;
pub mod tournament;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Paged list response: one page of rows plus the total row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows of the requested page
    pub data: Vec<T>,

    /// Total number of rows, independent of paging
    pub count: i64,
}

impl<T> Page<T> {
    /// Builds a page, converting each row into its public shape
    pub fn from_rows<R>(rows: Vec<R>, count: i64) -> Self
    where
        R: Into<T>,
    {
        Self {
            data: rows.into_iter().map(Into::into).collect(),
            count,
        }
    }
}

/// Offset paging parameters (`?skip=0&limit=100`)
///
/// Request input is checked with `Validate`. The list operations clamp
/// whatever reaches them through [`ListParams::row_offset`] and
/// [`ListParams::row_limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListParams {
    /// Rows to skip
    #[serde(default)]
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: i64,

    /// Maximum rows to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl ListParams {
    /// Rows to skip, never negative
    pub fn row_offset(&self) -> i64 {
        self.skip.max(0)
    }

    /// Page size, kept within the validated range
    pub fn row_limit(&self) -> i64 {
        self.limit.clamp(MIN_LIMIT, MAX_LIMIT)
    }
}

const MIN_LIMIT: i64 = 1;
const MAX_LIMIT: i64 = 1000;

fn default_limit() -> i64 {
    100
}

pub(crate) fn default_true() -> bool {
    true
}

/// Deserializes a clearable field
///
/// Used with `#[serde(default)]`: an absent key stays `None` (leave the
/// column alone), an explicit `null` becomes `Some(None)` (clear it).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
