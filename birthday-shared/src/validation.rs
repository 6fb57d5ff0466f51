/// Request body validation
///
/// [`ValidatedJson`] is a drop-in replacement for `axum::Json` on the request
/// side: it deserializes the body and then runs the shape's `validator` rules
/// before the handler ever sees the value.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::post, Json, Router};
/// use birthday_shared::error::ApiResult;
/// use birthday_shared::models::item::ItemCreate;
/// use birthday_shared::validation::ValidatedJson;
///
/// async fn preview(ValidatedJson(item): ValidatedJson<ItemCreate>) -> ApiResult<Json<ItemCreate>> {
///     Ok(Json(item))
/// }
///
/// let app: Router = Router::new().route("/items/preview", post(preview));
/// ```

use crate::error::{ApiError, ValidationErrorDetail};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON body that has passed its validation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    /// Consumes the wrapper
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Body rejections: syntax problems are 400, shape mismatches are 422
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::invalid_field("body", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => ApiError::BadRequest(err.body_text()),
            JsonRejection::MissingJsonContentType(err) => ApiError::BadRequest(err.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Flattens `validator` errors into field/message pairs
///
/// Nested struct fields are joined with `.` and list entries with `[i]`.
/// Struct-level rules appear under the field name `__all__`. The result is
/// sorted by field so responses are stable.
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details = Vec::new();
    collect(errors, None, &mut details);
    details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    details
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<ValidationErrorDetail>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| ValidationErrorDetail {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Failed '{}' validation", error.code)),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect(nested, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}
