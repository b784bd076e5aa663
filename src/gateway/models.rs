//! Bookstore Wire Models
//!
//! Records exchanged with the gateway. Field names follow the gateway's
//! camelCase JSON; every field the gateway may omit has a default.

use serde::{Deserialize, Serialize};

// =============================================================================
// Profile
// =============================================================================

/// The signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub address: String,
    pub on_going_cart_id: Option<String>,
}

impl Profile {
    /// True when the profile has an open (not yet checked out) cart.
    pub fn has_ongoing_order(&self) -> bool {
        self.on_going_cart_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

/// The editable part of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub display_name: String,
    pub address: String,
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            address: profile.address.clone(),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub websafe_key: String,
    pub name: String,
    pub description: String,
    pub category: Vec<String>,
    pub author: String,
    pub price: f64,
}

/// Fields a user fills in to create a book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookForm {
    pub name: String,
    pub description: String,
    pub category: Vec<String>,
    pub author: String,
    pub price: f64,
}

/// Book fields a catalog query can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterField {
    Name,
    Author,
}

impl FilterField {
    pub const ALL: [FilterField; 2] = [FilterField::Name, FilterField::Author];

    pub fn display_name(self) -> &'static str {
        match self {
            FilterField::Name => "Name",
            FilterField::Author => "Author",
        }
    }
}

/// One `field starts with value` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: FilterField,
    pub value: String,
}

/// Body of `queryBooks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookQueryForm {
    pub filters: Vec<Filter>,
}

// =============================================================================
// Cart
// =============================================================================

/// A cart, open or checked out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    pub websafe_key: String,
    pub checked_out: bool,
    pub customer_display_name: String,
    pub total: f64,
    pub date: Option<String>,
    pub address: Option<String>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub card_expiry_date: Option<String>,
    pub card_ccv: Option<u32>,
    pub book_keys: Vec<String>,
}

/// Shipping and payment details submitted at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub address: String,
    pub card_name: String,
    pub card_number: String,
    pub card_expiry_date: String,
    pub card_ccv: Option<u32>,
}

impl CheckoutForm {
    /// Every field is required before the cart may be submitted.
    pub fn is_complete(&self) -> bool {
        [
            &self.address,
            &self.card_name,
            &self.card_number,
            &self.card_expiry_date,
        ]
        .iter()
        .all(|s| !s.trim().is_empty())
            && self.card_ccv.is_some()
    }
}

// =============================================================================
// Acknowledgements
// =============================================================================

/// Payload of the cart mutations: a boolean-ish outcome, a reason and the
/// name of what was affected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receipt {
    pub result: Option<bool>,
    pub reason: Option<String>,
    pub name: Option<String>,
}

impl Receipt {
    /// A receipt without an explicit `result` counts as accepted.
    pub fn accepted(&self) -> bool {
        self.result.unwrap_or(true)
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_serialize_as_upper_case_enums() {
        let form = BookQueryForm {
            filters: vec![Filter {
                field: FilterField::Author,
                value: "Tolk".into(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({ "filters": [{ "field": "AUTHOR", "value": "Tolk" }] })
        );
    }

    #[test]
    fn test_book_tolerates_missing_fields() {
        let book: Book = serde_json::from_value(json!({ "name": "Dune" })).unwrap();
        assert_eq!(book.name, "Dune");
        assert!(book.category.is_empty());
    }

    #[test]
    fn test_ongoing_order() {
        let mut profile = Profile::default();
        assert!(!profile.has_ongoing_order());
        profile.on_going_cart_id = Some(String::new());
        assert!(!profile.has_ongoing_order());
        profile.on_going_cart_id = Some("c1".into());
        assert!(profile.has_ongoing_order());
    }

    #[test]
    fn test_checkout_form_completeness() {
        let mut form = CheckoutForm {
            address: "1 Main St".into(),
            card_name: "A".into(),
            card_number: "4111".into(),
            card_expiry_date: "12/30".into(),
            card_ccv: None,
        };
        assert!(!form.is_complete());
        form.card_ccv = Some(123);
        assert!(form.is_complete());
        form.address = "  ".into();
        assert!(!form.is_complete());
    }

    #[test]
    fn test_receipt_defaults() {
        let receipt: Receipt = serde_json::from_value(json!({ "name": "Some Book" })).unwrap();
        assert!(receipt.accepted());
        assert_eq!(receipt.name(), "Some Book");
        let refused: Receipt = serde_json::from_value(json!({ "result": false })).unwrap();
        assert!(!refused.accepted());
    }
}
