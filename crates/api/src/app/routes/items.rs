use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::routes::system::not_found;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// A known path hit with an unsupported method is answered like an unknown route.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item).fallback(not_found))
        .route("/stats/summary", get(summary).fallback(not_found))
        .route(
            "/:id",
            get(get_item)
                .put(update_item)
                .delete(delete_item)
                .fallback(not_found),
        )
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::ListItemsParams>, QueryRejection>,
) -> axum::response::Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    let query = params.into_query();
    match services.repository().list(&query).await {
        Ok(items) => {
            let items = items.iter().map(dto::item_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.repository().get(&id).await {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.repository().create(body.into()).await {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.repository().update(&id, body.into()).await {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.repository().delete(&id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Item deleted successfully",
                "item": dto::item_to_json(&item),
            })),
        )
            .into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.repository().summarize().await {
        Ok(s) => (StatusCode::OK, Json(dto::summary_to_json(&s))).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}
