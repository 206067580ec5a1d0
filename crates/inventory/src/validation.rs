//! Schema rules enforced before anything reaches a store.
//!
//! `validate` is a pure function: it collects every violated rule into a
//! `ValidationErrors` list instead of stopping at the first one.

use crate::item::Category;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Unvalidated candidate record. `None` means "missing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

/// A record that passed every rule, with normalized values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// One or more rule violations, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Inventory validation failed: {}", join_errors(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_str())
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trim and upper-case a sku. Applied before any comparison or storage.
pub fn normalize_sku(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check every rule against `draft`.
pub fn validate(draft: ItemDraft) -> Result<ValidItem, ValidationErrors> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: String| {
        errors.push(FieldError { field, message });
    };

    let sku = draft
        .sku
        .as_deref()
        .map(normalize_sku)
        .filter(|s| !s.is_empty());
    if sku.is_none() {
        fail("sku", "SKU is required".to_string());
    }

    let name = trimmed(draft.name);
    match name.as_deref().map(|n| n.chars().count()) {
        None => fail("name", "Item name is required".to_string()),
        Some(len) if len < NAME_MIN_CHARS => fail(
            "name",
            format!("Name must be at least {NAME_MIN_CHARS} characters"),
        ),
        Some(len) if len > NAME_MAX_CHARS => fail(
            "name",
            format!("Name cannot exceed {NAME_MAX_CHARS} characters"),
        ),
        Some(_) => {}
    }

    let description = trimmed(draft.description);
    if description
        .as_deref()
        .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS)
    {
        fail(
            "description",
            format!("Description cannot exceed {DESCRIPTION_MAX_CHARS} characters"),
        );
    }

    match draft.quantity {
        None => fail("quantity", "Quantity is required".to_string()),
        Some(q) if q < 0 => fail("quantity", "Quantity cannot be negative".to_string()),
        Some(_) => {}
    }

    match draft.price {
        None => fail("price", "Price is required".to_string()),
        Some(p) if !p.is_finite() => fail("price", "Price must be a finite number".to_string()),
        Some(p) if p < 0.0 => fail("price", "Price cannot be negative".to_string()),
        Some(_) => {}
    }

    let category = match draft.category.as_deref() {
        None => {
            fail("category", "Category is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<Category>() {
            Ok(c) => Some(c),
            Err(e) => {
                fail("category", e.to_string());
                None
            }
        },
    };

    match (sku, name, draft.quantity, draft.price, category) {
        (Some(sku), Some(name), Some(quantity), Some(price), Some(category)) if errors.is_empty() => {
            Ok(ValidItem {
                sku,
                name,
                description,
                quantity,
                price,
                category,
            })
        }
        _ => Err(ValidationErrors { errors }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ItemDraft {
        ItemDraft {
            sku: Some("  test-1 ".into()),
            name: Some(" Widget ".into()),
            description: None,
            quantity: Some(3),
            price: Some(9.5),
            category: Some("Tools".into()),
        }
    }

    #[test]
    fn accepts_and_normalizes_a_valid_draft() {
        let valid = validate(draft()).unwrap();
        assert_eq!(valid.sku, "TEST-1");
        assert_eq!(valid.name, "Widget");
        assert_eq!(valid.category, Category::Tools);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = validate(ItemDraft::default()).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["sku", "name", "quantity", "price", "category"]);
        assert_eq!(
            err.to_string(),
            "Inventory validation failed: sku: SKU is required, name: Item name is required, \
             quantity: Quantity is required, price: Price is required, category: Category is required"
        );
    }

    #[test]
    fn blank_sku_counts_as_missing() {
        let err = validate(ItemDraft {
            sku: Some("   ".into()),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(err.messages().collect::<Vec<_>>(), vec!["SKU is required"]);
    }

    #[test]
    fn negative_quantity_rejected() {
        let err = validate(ItemDraft {
            quantity: Some(-5),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            vec!["Quantity cannot be negative"]
        );
    }

    #[test]
    fn negative_and_non_finite_price_rejected() {
        let err = validate(ItemDraft {
            price: Some(-0.01),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(err.messages().collect::<Vec<_>>(), vec!["Price cannot be negative"]);

        let err = validate(ItemDraft {
            price: Some(f64::NAN),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            vec!["Price must be a finite number"]
        );
    }

    #[test]
    fn unknown_category_is_echoed() {
        let err = validate(ItemDraft {
            category: Some("Gadgets".into()),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            vec!["Gadgets is not a valid category"]
        );
    }

    #[test]
    fn name_bounds() {
        let short = validate(ItemDraft {
            name: Some("A".into()),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            short.messages().collect::<Vec<_>>(),
            vec!["Name must be at least 2 characters"]
        );

        let long = validate(ItemDraft {
            name: Some("x".repeat(101)),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            long.messages().collect::<Vec<_>>(),
            vec!["Name cannot exceed 100 characters"]
        );

        assert!(validate(ItemDraft {
            name: Some("x".repeat(100)),
            ..draft()
        })
        .is_ok());
    }

    #[test]
    fn description_bound_and_blank_description_dropped() {
        let err = validate(ItemDraft {
            description: Some("d".repeat(501)),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            vec!["Description cannot exceed 500 characters"]
        );

        let valid = validate(ItemDraft {
            description: Some("   ".into()),
            ..draft()
        })
        .unwrap();
        assert_eq!(valid.description, None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: stored skus are trimmed, upper-case, and normalization is idempotent.
            #[test]
            fn sku_normalization_is_idempotent(raw in "[ ]{0,3}[a-zA-Z0-9-]{1,20}[ ]{0,3}") {
                let valid = validate(ItemDraft { sku: Some(raw.clone()), ..draft() }).unwrap();
                prop_assert_eq!(&valid.sku, &raw.trim().to_uppercase());
                prop_assert_eq!(normalize_sku(&valid.sku), valid.sku.clone());
            }

            /// Property: quantity is accepted exactly when it is non-negative.
            #[test]
            fn quantity_sign_decides(q in -1_000_000i64..1_000_000) {
                let res = validate(ItemDraft { quantity: Some(q), ..draft() });
                prop_assert_eq!(res.is_ok(), q >= 0);
            }

            /// Property: name length in [2, 100] characters is accepted, anything else is not.
            #[test]
            fn name_length_window(len in 1usize..130) {
                let res = validate(ItemDraft { name: Some("n".repeat(len)), ..draft() });
                prop_assert_eq!(res.is_ok(), (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len));
            }
        }
    }
}
