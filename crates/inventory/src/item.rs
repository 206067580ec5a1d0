use core::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use stockroom_core::{DomainError, ItemId};

use crate::validation::{ItemDraft, ValidItem};

/// Items with a quantity strictly below this are "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Current time truncated to millisecond precision.
///
/// Every timestamp the domain hands to a store goes through here so that a
/// value read back from Postgres compares equal to the one written.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Closed set of classification tags.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    Books,
    Tools,
    #[default]
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Books,
        Category::Tools,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Food => "Food",
            Category::Books => "Books",
            Category::Tools => "Tools",
            Category::Other => "Other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Exact, case-sensitive match against the enumeration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("{s} is not a valid category")))
    }
}

/// A persisted inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Build a brand-new item from a validated payload.
    pub fn create(id: ItemId, valid: ValidItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            sku: valid.sku,
            name: valid.name,
            description: valid.description,
            quantity: valid.quantity,
            price: valid.price,
            category: valid.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields with a validated revision.
    ///
    /// `id` and `created_at` are kept; `updated_at` never moves before
    /// `created_at`.
    pub fn revise(&self, valid: ValidItem, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            sku: valid.sku,
            name: valid.name,
            description: valid.description,
            quantity: valid.quantity,
            price: valid.price,
            category: valid.category,
            created_at: self.created_at,
            updated_at: now.max(self.created_at),
        }
    }

    /// Current field values as an unvalidated draft with `patch` applied on top.
    pub fn merge(&self, patch: ItemPatch) -> ItemDraft {
        fn pick<T>(current: Option<T>, change: Option<Option<T>>) -> Option<T> {
            match change {
                None => current,
                Some(next) => next,
            }
        }

        ItemDraft {
            sku: pick(Some(self.sku.clone()), patch.sku),
            name: pick(Some(self.name.clone()), patch.name),
            description: pick(self.description.clone(), patch.description),
            quantity: pick(Some(self.quantity), patch.quantity),
            price: pick(Some(self.price), patch.price),
            category: pick(Some(self.category.as_str().to_string()), patch.category),
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    pub fn total_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Create payload.
///
/// `None` means the field was absent; `Some(None)` means it was explicitly
/// null. Absent `quantity` and `category` take their defaults, explicit nulls
/// are reported as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Option<i64>>,
    pub price: Option<f64>,
    pub category: Option<Option<String>>,
}

impl NewItem {
    /// The normalized sku this payload would write, if any.
    pub fn target_sku(&self) -> Option<String> {
        self.sku
            .as_deref()
            .map(crate::validation::normalize_sku)
            .filter(|s| !s.is_empty())
    }

    pub fn into_draft(self) -> ItemDraft {
        ItemDraft {
            sku: self.sku,
            name: self.name,
            description: self.description,
            quantity: self.quantity.unwrap_or(Some(0)),
            price: self.price,
            category: self
                .category
                .unwrap_or_else(|| Some(Category::default().as_str().to_string())),
        }
    }
}

/// Partial update: `None` leaves a field untouched, `Some(None)` clears it,
/// `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub sku: Option<Option<String>>,
    pub name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub quantity: Option<Option<i64>>,
    pub price: Option<Option<f64>>,
    pub category: Option<Option<String>>,
}

impl ItemPatch {
    /// The normalized sku this patch would write, if it touches the sku at all.
    pub fn target_sku(&self) -> Option<String> {
        self.sku
            .as_ref()
            .and_then(|s| s.as_deref())
            .map(crate::validation::normalize_sku)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn widget() -> InventoryItem {
        let valid = validate(NewItem {
            sku: Some("w-1".into()),
            name: Some("Widget".into()),
            quantity: Some(Some(3)),
            price: Some(9.5),
            category: Some(Some("Tools".into())),
            ..NewItem::default()
        }
        .into_draft())
        .unwrap();
        InventoryItem::create(ItemId::new(), valid, timestamp_now())
    }

    #[test]
    fn category_parse_is_exact() {
        assert_eq!("Books".parse::<Category>().unwrap(), Category::Books);
        let err = "books".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "books is not a valid category");
    }

    #[test]
    fn derived_values() {
        let item = widget();
        assert!(item.is_low_stock());
        assert_eq!(item.total_value(), 28.5);
    }

    #[test]
    fn new_item_defaults_quantity_and_category() {
        let draft = NewItem::default().into_draft();
        assert_eq!(draft.quantity, Some(0));
        assert_eq!(draft.category.as_deref(), Some("Other"));
    }

    #[test]
    fn explicit_null_is_not_defaulted() {
        let draft = NewItem {
            quantity: Some(None),
            category: Some(None),
            ..NewItem::default()
        }
        .into_draft();
        assert_eq!(draft.quantity, None);
        assert_eq!(draft.category, None);
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let item = widget();
        let draft = item.merge(ItemPatch {
            name: Some(Some("Gadget".into())),
            description: Some(None),
            ..ItemPatch::default()
        });
        assert_eq!(draft.sku.as_deref(), Some("W-1"));
        assert_eq!(draft.name.as_deref(), Some("Gadget"));
        assert_eq!(draft.description, None);
        assert_eq!(draft.quantity, Some(3));
        assert_eq!(draft.category.as_deref(), Some("Tools"));
    }

    #[test]
    fn revise_keeps_identity_and_creation_time() {
        let item = widget();
        let valid = validate(item.merge(ItemPatch {
            quantity: Some(Some(40)),
            ..ItemPatch::default()
        }))
        .unwrap();
        let later = item.created_at + chrono::Duration::milliseconds(5);
        let revised = item.revise(valid, later);
        assert_eq!(revised.id, item.id);
        assert_eq!(revised.created_at, item.created_at);
        assert_eq!(revised.updated_at, later);
        assert_eq!(revised.quantity, 40);
    }

    #[test]
    fn revise_never_moves_updated_at_before_created_at() {
        let item = widget();
        let valid = validate(item.merge(ItemPatch::default())).unwrap();
        let earlier = item.created_at - chrono::Duration::seconds(1);
        assert_eq!(item.revise(valid, earlier).updated_at, item.created_at);
    }

    #[test]
    fn target_sku_is_normalized() {
        let patch = ItemPatch {
            sku: Some(Some("  abc-9 ".into())),
            ..ItemPatch::default()
        };
        assert_eq!(patch.target_sku().as_deref(), Some("ABC-9"));
        assert_eq!(ItemPatch::default().target_sku(), None);

        let new_item = NewItem {
            sku: Some("   ".into()),
            ..NewItem::default()
        };
        assert_eq!(new_item.target_sku(), None);
    }
}
