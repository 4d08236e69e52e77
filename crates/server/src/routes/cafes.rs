//! Cafe JSON API handlers.
//!
//! Parameters come from the query string or a form body (urlencoded or
//! multipart), never from JSON. A repeated key uses its first value. Each handler makes one repository call; delete additionally
//! looks the record up first so an unknown id reports 404 whatever key was
//! sent.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use cafe_api_core::{Cafe, CafeId, NewCafe};

use crate::db::{CafeRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::extract::{FormParams, Params, QueryParams};
use crate::state::AppState;

const LOCATION_NOT_FOUND: &str = "Sorry, we don't have a cafe at that location.";
const CAFE_NOT_FOUND: &str = "Sorry a cafe with that id was not found in the database.";
const WRONG_API_KEY: &str = "Sorry, that's not allowed. Make sure you have the correct api_key.";

const ADDED: &str = "successfully added the new cafe.";
const PRICE_UPDATED: &str = "Successfully updated the price.";
const DELETED: &str = "The cafe has been successfully deleted from the database.";

// =============================================================================
// Response bodies
// =============================================================================

/// `{"cafe": {...}}`
#[derive(Debug, Serialize)]
pub struct RandomCafeResponse {
    pub cafe: Cafe,
}

/// `{"cafes": [...]}`
#[derive(Debug, Serialize)]
pub struct AllCafesResponse {
    pub cafes: Vec<Cafe>,
}

/// `{"cafe": [...]}`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub cafe: Vec<Cafe>,
}

/// `{"success": "..."}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: &'static str,
}

/// `{"response": {"success": "..."}}`
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub response: SuccessResponse,
}

// =============================================================================
// Request parameters
// =============================================================================

/// Form fields for `/add`.
///
/// Boolean fields are kept as raw strings and coerced by [`is_truthy`].
#[derive(Debug, Default)]
pub struct AddCafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub loc: Option<String>,
    pub seats: Option<String>,
    pub toilet: Option<String>,
    pub wifi: Option<String>,
    pub sockets: Option<String>,
    pub calls: Option<String>,
    pub coffee_price: Option<String>,
}

impl From<&Params> for AddCafeForm {
    fn from(params: &Params) -> Self {
        Self {
            name: params.take("name"),
            map_url: params.take("map_url"),
            img_url: params.take("img_url"),
            loc: params.take("loc"),
            seats: params.take("seats"),
            toilet: params.take("toilet"),
            wifi: params.take("wifi"),
            sockets: params.take("sockets"),
            calls: params.take("calls"),
            coffee_price: params.take("coffee_price"),
        }
    }
}

impl From<AddCafeForm> for NewCafe {
    fn from(form: AddCafeForm) -> Self {
        Self {
            has_toilet: is_truthy(form.toilet.as_deref()),
            has_wifi: is_truthy(form.wifi.as_deref()),
            has_sockets: is_truthy(form.sockets.as_deref()),
            can_take_calls: is_truthy(form.calls.as_deref()),
            name: form.name,
            map_url: form.map_url,
            img_url: form.img_url,
            location: form.loc,
            seats: form.seats,
            coffee_price: form.coffee_price,
        }
    }
}

/// Form booleans are true when the field is present and non-empty.
///
/// The raw value is not inspected, so `"false"` and `"0"` are true.
#[must_use]
pub fn is_truthy(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| !value.is_empty())
}

/// Parse a path segment as a cafe id. Anything unparseable is an unknown id.
fn parse_cafe_id(raw: &str) -> Result<CafeId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(CAFE_NOT_FOUND.to_string()))
}

/// Replace the repository's bare not-found with the cafe-specific message.
fn cafe_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(CAFE_NOT_FOUND.to_string()),
        other => AppError::Database(other),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Return one cafe picked at random.
///
/// GET /random
#[instrument(skip(state))]
pub async fn random(State(state): State<AppState>) -> Result<Json<RandomCafeResponse>> {
    let cafe = CafeRepository::new(state.pool()).pick_random().await?;
    Ok(Json(RandomCafeResponse { cafe }))
}

/// Return every cafe.
///
/// GET /all
#[instrument(skip(state))]
pub async fn all(State(state): State<AppState>) -> Result<Json<AllCafesResponse>> {
    let cafes = CafeRepository::new(state.pool()).list_all().await?;
    Ok(Json(AllCafesResponse { cafes }))
}

/// Return the cafes at exactly the given location.
///
/// GET /search?loc=
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    QueryParams(query): QueryParams,
) -> Result<Json<SearchResponse>> {
    let Some(location) = query.first("loc") else {
        return Err(AppError::NotFound(LOCATION_NOT_FOUND.to_string()));
    };

    let cafes = CafeRepository::new(state.pool())
        .find_by_location(location)
        .await?;

    if cafes.is_empty() {
        return Err(AppError::NotFound(LOCATION_NOT_FOUND.to_string()));
    }

    Ok(Json(SearchResponse { cafe: cafes }))
}

/// Create a cafe from form fields.
///
/// POST /add (urlencoded or multipart body) or GET /add (query string)
#[instrument(skip(state, params), fields(name = ?params.first("name")))]
pub async fn add(
    State(state): State<AppState>,
    FormParams(params): FormParams,
) -> Result<Json<AddResponse>> {
    let form = AddCafeForm::from(&params);

    CafeRepository::new(state.pool())
        .insert(NewCafe::from(form))
        .await?;

    Ok(Json(AddResponse {
        response: SuccessResponse { success: ADDED },
    }))
}

/// Set a cafe's coffee price. A missing `new_price` clears it.
///
/// GET|POST|PATCH /update-price/{cafe_id}?new_price=
#[instrument(skip(state))]
pub async fn update_price(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
    QueryParams(query): QueryParams,
) -> Result<Json<SuccessResponse>> {
    let id = parse_cafe_id(&cafe_id)?;

    CafeRepository::new(state.pool())
        .update_coffee_price(id, query.first("new_price"))
        .await
        .map_err(cafe_not_found)?;

    Ok(Json(SuccessResponse {
        success: PRICE_UPDATED,
    }))
}

/// Delete a cafe when the caller presents the shared API key.
///
/// GET|POST|DELETE|PATCH /delete/{cafe_id}?api-key=
#[instrument(skip(state, query))]
pub async fn delete(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
    QueryParams(query): QueryParams,
) -> Result<Json<SuccessResponse>> {
    let id = parse_cafe_id(&cafe_id)?;
    let repo = CafeRepository::new(state.pool());

    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(CAFE_NOT_FOUND.to_string()));
    }

    if !state.config().api_key_matches(query.first("api-key")) {
        tracing::debug!(cafe_id = %id, "delete rejected: wrong api key");
        return Err(AppError::Forbidden(WRONG_API_KEY.to_string()));
    }

    repo.delete(id).await.map_err(cafe_not_found)?;

    Ok(Json(SuccessResponse { success: DELETED }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("on")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_is_truthy_keeps_loose_coercion() {
        assert!(is_truthy(Some("false")));
        assert!(is_truthy(Some("0")));
    }

    #[test]
    fn test_form_maps_to_new_cafe() {
        let form = AddCafeForm {
            name: Some("Alpha".to_string()),
            map_url: Some("https://maps.example.com/alpha".to_string()),
            img_url: Some("https://img.example.com/alpha.jpg".to_string()),
            loc: Some("Peckham".to_string()),
            seats: Some("10-20".to_string()),
            toilet: Some("yes".to_string()),
            wifi: Some(String::new()),
            sockets: None,
            calls: Some("false".to_string()),
            coffee_price: None,
        };

        let cafe = NewCafe::from(form);
        assert_eq!(cafe.location.as_deref(), Some("Peckham"));
        assert!(cafe.has_toilet);
        assert!(!cafe.has_wifi);
        assert!(!cafe.has_sockets);
        assert!(cafe.can_take_calls);
        assert!(cafe.coffee_price.is_none());
        assert!(cafe.validate().is_ok());
    }

    #[test]
    fn test_form_fields_use_first_value() {
        let params = Params::from(vec![
            ("name".to_string(), "Alpha".to_string()),
            ("loc".to_string(), "Peckham".to_string()),
            ("name".to_string(), "Beta".to_string()),
        ]);

        let form = AddCafeForm::from(&params);
        assert_eq!(form.name.as_deref(), Some("Alpha"));
        assert_eq!(form.loc.as_deref(), Some("Peckham"));
        assert!(form.map_url.is_none());
    }

    #[test]
    fn test_empty_form_is_missing_name() {
        let cafe = NewCafe::from(AddCafeForm::default());
        assert_eq!(cafe.validate().unwrap_err().0, "name");
    }

    #[test]
    fn test_parse_cafe_id() {
        assert_eq!(parse_cafe_id("12").unwrap(), CafeId::new(12));
        assert!(matches!(parse_cafe_id("twelve"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_cafe_not_found_keeps_other_errors() {
        assert!(matches!(
            cafe_not_found(RepositoryError::NotFound),
            AppError::NotFound(ref msg) if msg == CAFE_NOT_FOUND
        ));
        assert!(matches!(
            cafe_not_found(RepositoryError::EmptyStore),
            AppError::Database(RepositoryError::EmptyStore)
        ));
    }

    #[test]
    fn test_add_response_shape() {
        let body = serde_json::to_value(AddResponse {
            response: SuccessResponse { success: ADDED },
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "response": { "success": "successfully added the new cafe." } })
        );
    }
}
