pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{request_id_middleware, RequestId},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use config::LaundryConfig;
use handlers::resource;
use middleware::{auth_middleware, require_role};
use models::{
    Customer, Entity, Item, ItemTransaction, Resource, Role, SalesTransaction, StockTransaction,
    Supplier,
};
use services::{DocumentStore, JwtService, Repository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<LaundryConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(config: LaundryConfig, store: Arc<dyn DocumentStore>) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.expiry_hours);
        Self {
            config: Arc::new(config),
            store,
            jwt,
        }
    }

    pub fn repository<T: Entity>(&self) -> Repository<T> {
        Repository::new(Arc::clone(&self.store))
    }
}

/// `POST <collection>` / `GET <collection>` plus `GET|PUT|DELETE <by_id>?id=`.
fn resource_routes<T: Resource>(collection: &str, by_id: &str) -> Router<AppState> {
    Router::new()
        .route(
            collection,
            post(resource::create::<T>).get(resource::list::<T>),
        )
        .route(
            by_id,
            get(resource::get::<T>)
                .put(resource::update::<T>)
                .delete(resource::delete::<T>),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let admin_only = from_fn_with_state(Role::Admin, require_role);

    let protected = Router::new()
        .route(
            "/register",
            post(handlers::register.layer(admin_only.clone())),
        )
        // Capitalised path used by the existing frontend.
        .route(
            "/Register",
            post(handlers::register.layer(admin_only.clone())),
        )
        .route("/employee", get(handlers::list_employees))
        .route("/employee-names", get(handlers::list_employee_names))
        .route(
            "/employee-id",
            get(handlers::get_employee)
                .put(handlers::update_employee.layer(admin_only.clone()))
                .delete(handlers::delete_employee.layer(admin_only)),
        )
        .route("/customer-names", get(handlers::customer_names))
        .route("/customer-name", get(handlers::customer_name))
        .route(
            "/item-transaction-summary",
            get(handlers::item_transaction_summary),
        )
        .route(
            "/supplier/transaction",
            post(handlers::add_supplier_transaction),
        )
        .merge(resource_routes::<Customer>("/customer", "/customer-id"))
        .merge(resource_routes::<Supplier>("/supplier", "/supplier-id"))
        .merge(resource_routes::<Item>("/item", "/item-id"))
        .merge(resource_routes::<ItemTransaction>(
            "/item-transaction",
            "/item-transaction-id",
        ))
        .merge(resource_routes::<StockTransaction>(
            "/stock-transaction",
            "/stock-transaction-id",
        ))
        .merge(resource_routes::<SalesTransaction>(
            "/transaction",
            "/transaction-id",
        ))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let cors = cors_layer(&state.config.security.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/login", post(handlers::login))
        .merge(protected)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}
