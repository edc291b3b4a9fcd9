//! Route definitions for the Sapi Seto back office

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes. Everything except health and login sits behind the
/// session check.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/products", product_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/customers", customer_routes())
        .nest("/expenses", expense_routes())
        .nest("/purchases", purchase_routes())
        .nest("/sales", sale_routes())
        .route("/dashboard", get(handlers::dashboard_summary))
        .route("/auth/session", get(handlers::session))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        .merge(protected)
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
}

fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_expenses).post(handlers::create_expense))
        .route(
            "/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}

/// Purchase ledger routes, including payables
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route(
            "/:id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route(
            "/:id/payments",
            get(handlers::list_purchase_payments).post(handlers::record_purchase_payment),
        )
}

/// Sale ledger routes, including receivables. Sales cannot be edited or deleted.
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:id", get(handlers::get_sale))
        .route(
            "/:id/payments",
            get(handlers::list_sale_payments).post(handlers::record_sale_payment),
        )
}
