use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use stockroom_inventory::{
    InventoryItem, InventorySummary, ItemPatch, ListQuery, NewItem, SortField, SortOrder,
};

// -------------------------
// Request DTOs
// -------------------------

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: Option<Option<i64>>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
}

impl From<CreateItemRequest> for NewItem {
    fn from(body: CreateItemRequest) -> Self {
        NewItem {
            sku: body.sku,
            name: body.name,
            description: body.description,
            quantity: body.quantity,
            price: body.price,
            category: body.category,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub sku: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(body: UpdateItemRequest) -> Self {
        ItemPatch {
            sku: body.sku,
            name: body.name,
            description: body.description,
            quantity: body.quantity,
            price: body.price,
            category: body.category,
        }
    }
}

/// Query string of `GET /items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsParams {
    pub category: Option<String>,
    pub low_stock: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListItemsParams {
    pub fn into_query(self) -> ListQuery {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("") => SortField::default(),
            Some(raw) => SortField::from_param(raw).unwrap_or_else(|| {
                tracing::debug!(sort_by = raw, "unknown sort field; using createdAt");
                SortField::default()
            }),
        };

        ListQuery {
            category: self.category.filter(|c| !c.is_empty()),
            low_stock: self.low_stock.as_deref() == Some("true"),
            sort_by,
            order: self
                .order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn item_to_json(item: &InventoryItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "sku": item.sku,
        "name": item.name,
        "description": item.description,
        "quantity": item.quantity,
        "price": item.price,
        "category": item.category.as_str(),
        "createdAt": timestamp(item.created_at),
        "updatedAt": timestamp(item.updated_at),
        "isLowStock": item.is_low_stock(),
        "totalValue": item.total_value(),
    })
}

pub fn summary_to_json(summary: &InventorySummary) -> serde_json::Value {
    serde_json::json!({
        "totalItems": summary.total_items,
        "lowStockItems": summary.low_stock_items,
        "categoryStats": summary.category_stats.iter().map(|s| serde_json::json!({
            "category": s.category.as_str(),
            "count": s.count,
            "totalValue": s.total_value,
        })).collect::<Vec<_>>(),
    })
}

pub fn health_to_json(environment: &str, now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "status": "UP",
        "timestamp": timestamp(now),
        "environment": environment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_distinguishes_absent_from_null() {
        let absent: CreateItemRequest = serde_json::from_str(r#"{"sku":"a"}"#).unwrap();
        assert_eq!(absent.quantity, None);
        assert_eq!(absent.category, None);

        let null: CreateItemRequest =
            serde_json::from_str(r#"{"sku":"a","quantity":null,"category":null}"#).unwrap();
        assert_eq!(null.quantity, Some(None));
        assert_eq!(null.category, Some(None));
    }

    #[test]
    fn update_request_maps_to_patch() {
        let body: UpdateItemRequest =
            serde_json::from_str(r#"{"name":"New","description":null}"#).unwrap();
        let patch = ItemPatch::from(body);
        assert_eq!(patch.name, Some(Some("New".to_string())));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.quantity, None);
    }

    #[test]
    fn list_params_defaults() {
        let q = ListItemsParams::default().into_query();
        assert_eq!(q, ListQuery::default());
    }

    #[test]
    fn list_params_parse() {
        let q = ListItemsParams {
            category: Some("Books".into()),
            low_stock: Some("true".into()),
            sort_by: Some("price".into()),
            order: Some("asc".into()),
        }
        .into_query();
        assert_eq!(q.category.as_deref(), Some("Books"));
        assert!(q.low_stock);
        assert_eq!(q.sort_by, SortField::Price);
        assert_eq!(q.order, SortOrder::Asc);

        let q = ListItemsParams {
            low_stock: Some("TRUE".into()),
            sort_by: Some("password".into()),
            ..ListItemsParams::default()
        }
        .into_query();
        assert!(!q.low_stock);
        assert_eq!(q.sort_by, SortField::CreatedAt);
    }
}
