//! API route configuration.

use crate::api::handlers::{
    account_details_handler, create_account_handler, create_resident_handler,
    delete_account_handler, delete_resident_handler, filter_accounts_handler,
    get_account_by_number_handler, get_resident_handler, list_accounts_handler,
    list_residents_handler, update_account_handler, update_resident_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `GET    /account`               - List accounts
/// - `POST   /account`               - Create an account
/// - `GET    /account/filter`        - Search accounts
/// - `GET    /account/details/{id}`  - Account with residents
/// - `GET    /account/{key}`         - Account by 10-digit number
/// - `PUT    /account/{key}`         - Update account by id
/// - `DELETE /account/{key}`         - Delete account by id
/// - `GET    /resident`              - List residents
/// - `POST   /resident`              - Create a resident
/// - `GET    /resident/{id}`         - Resident by id
/// - `PUT    /resident/{id}`         - Update a resident
/// - `DELETE /resident/{id}`         - Delete a resident
///
/// `/account/{key}` is one route because the router allows a single
/// parameter name per segment; `GET` reads it as a number, `PUT` and
/// `DELETE` as an id.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account",
            get(list_accounts_handler).post(create_account_handler),
        )
        .route("/account/filter", get(filter_accounts_handler))
        .route("/account/details/{id}", get(account_details_handler))
        .route(
            "/account/{key}",
            get(get_account_by_number_handler)
                .put(update_account_handler)
                .delete(delete_account_handler),
        )
        .route(
            "/resident",
            get(list_residents_handler).post(create_resident_handler),
        )
        .route(
            "/resident/{id}",
            get(get_resident_handler)
                .put(update_resident_handler)
                .delete(delete_resident_handler),
        )
}
