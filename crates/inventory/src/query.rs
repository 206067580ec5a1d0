//! List filtering and sorting.

use core::cmp::Ordering;

use crate::item::{InventoryItem, LOW_STOCK_THRESHOLD};

/// Sortable fields. Anything outside this set falls back to `CreatedAt`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortField {
    Sku,
    Name,
    Description,
    Quantity,
    Price,
    Category,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse the wire name of a field (camelCase, as exposed in JSON).
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "sku" => Some(SortField::Sku),
            "name" => Some(SortField::Name),
            "description" => Some(SortField::Description),
            "quantity" => Some(SortField::Quantity),
            "price" => Some(SortField::Price),
            "category" => Some(SortField::Category),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Storage column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Sku => "sku",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Quantity => "quantity",
            SortField::Price => "price",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `"asc"` sorts ascending; every other value sorts descending.
    pub fn from_param(s: &str) -> Self {
        if s == "asc" { SortOrder::Asc } else { SortOrder::Desc }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Placement of missing values: first when ascending, last when descending.
    /// `compare` orders `None` below any value, and SQL must agree.
    pub fn nulls_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "NULLS FIRST",
            SortOrder::Desc => "NULLS LAST",
        }
    }
}

/// Filter + sort for listing items. The default lists everything, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Exact category name. An unknown name simply matches nothing.
    pub category: Option<String>,
    pub low_stock: bool,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl ListQuery {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if let Some(category) = &self.category {
            if item.category.as_str() != category {
                return false;
            }
        }
        if self.low_stock && item.quantity >= LOW_STOCK_THRESHOLD {
            return false;
        }
        true
    }

    /// Ordering of two items under this query's sort.
    pub fn compare(&self, a: &InventoryItem, b: &InventoryItem) -> Ordering {
        let ord = match self.sort_by {
            SortField::Sku => a.sku.cmp(&b.sku),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
        // UUIDv7 ids are time-ordered, so ties keep insertion order.
        .then_with(|| a.id.cmp(&b.id));

        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    /// Filter and sort an in-memory collection.
    pub fn apply<'a, I>(&self, items: I) -> Vec<InventoryItem>
    where
        I: IntoIterator<Item = &'a InventoryItem>,
    {
        let mut out: Vec<InventoryItem> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }
}
