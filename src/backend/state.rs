//! Reference Gateway State
//!
//! Profiles, books and carts held in memory for the lifetime of the process.

use dashmap::DashMap;
use std::sync::Arc;

use super::helpers::new_key;
use crate::gateway::models::{Book, Cart, Profile};

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler
pub type SharedState = Arc<StoreState>;

/// A cart together with the user it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCart {
    pub owner: String,
    pub cart: Cart,
}

#[derive(Debug, Default)]
pub struct StoreState {
    /// Keyed by user id.
    pub profiles: DashMap<String, Profile>,
    /// Keyed by websafe book key.
    pub books: DashMap<String, Book>,
    /// Keyed by websafe cart key.
    pub carts: DashMap<String, StoredCart>,
}

/// Profile of a user who has never saved one.
pub fn default_profile(user_id: &str) -> Profile {
    Profile {
        user_id: user_id.to_string(),
        display_name: user_id.to_string(),
        ..Default::default()
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Self::new())
    }

    /// Key of the user's open cart, if there is one.
    pub fn ongoing_cart_key(&self, user_id: &str) -> Option<String> {
        self.profiles
            .get(user_id)
            .filter(|profile| profile.has_ongoing_order())
            .and_then(|profile| profile.on_going_cart_id.clone())
    }

    /// Key of the user's open cart, opening one (and a profile) when needed.
    ///
    /// Never holds a profile guard while locking the cart map. A new cart is
    /// stored first and only claimed under the profile entry; when a
    /// concurrent call claimed one in between, the spare cart is discarded
    /// and every caller gets the same key.
    pub fn open_cart(&self, user_id: &str) -> String {
        if let Some(key) = self.ongoing_cart_key(user_id) {
            return key;
        }

        let key = new_key();
        self.carts.insert(
            key.clone(),
            StoredCart {
                owner: user_id.to_string(),
                cart: Cart {
                    websafe_key: key.clone(),
                    ..Default::default()
                },
            },
        );

        let claimed = {
            let mut profile = self
                .profiles
                .entry(user_id.to_string())
                .or_insert_with(|| default_profile(user_id));
            if profile.has_ongoing_order() {
                profile.on_going_cart_id.clone()
            } else {
                profile.on_going_cart_id = Some(key.clone());
                None
            }
        };

        match claimed {
            Some(existing) => {
                self.carts.remove(&key);
                existing
            }
            None => key,
        }
    }

    /// The cart as the API presents it, with the owner's current display name.
    pub fn cart_view(&self, stored: &StoredCart) -> Cart {
        let mut cart = stored.cart.clone();
        cart.customer_display_name = self
            .profiles
            .get(&stored.owner)
            .map(|profile| profile.display_name.clone())
            .unwrap_or_else(|| stored.owner.clone());
        cart
    }

    /// Checked-out carts, optionally limited to one owner, oldest first.
    pub fn checked_out_carts(&self, owner: Option<&str>) -> Vec<Cart> {
        let mut carts: Vec<Cart> = self
            .carts
            .iter()
            .filter(|entry| entry.cart.checked_out)
            .filter(|entry| owner.map_or(true, |owner| entry.owner == owner))
            .map(|entry| self.cart_view(entry.value()))
            .collect();
        carts.sort_by(|a, b| a.date.cmp(&b.date));
        carts
    }
}
