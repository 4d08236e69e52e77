//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Landing page (HTML)
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness check (database)
//!
//! # Cafes (JSON)
//! GET  /random                             - One random cafe
//! GET  /all                                - Every cafe
//! GET  /search?loc=                        - Cafes at an exact location
//! GET|POST /add                            - Create a cafe from form fields
//! GET|POST|PATCH /update-price/{cafe_id}   - Set coffee_price from ?new_price=
//! GET|POST|DELETE|PATCH /delete/{cafe_id}  - Delete, requires ?api-key=
//! ```

pub mod cafes;
pub mod health;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the cafe JSON API router.
pub fn cafe_routes() -> Router<AppState> {
    Router::new()
        .route("/random", get(cafes::random))
        .route("/all", get(cafes::all))
        .route("/search", get(cafes::search))
        .route("/add", get(cafes::add).post(cafes::add))
        .route(
            "/update-price/{cafe_id}",
            get(cafes::update_price)
                .post(cafes::update_price)
                .patch(cafes::update_price),
        )
        .route(
            "/delete/{cafe_id}",
            get(cafes::delete)
                .post(cafes::delete)
                .delete(cafes::delete)
                .patch(cafes::delete),
        )
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(cafe_routes())
}
