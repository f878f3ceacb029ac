//! Datastore Module
//!
//! Local persistence for users, products, carts, orders and favorites.

mod filter;
mod ids;
mod store;

use std::fmt;

pub use filter::{loosely_equal, Filter};
pub use ids::IdGenerator;
pub use store::JsonStore;

/// Top-level collections of the datastore document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Products,
    Cart,
    Orders,
    Favorites,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Products,
        Collection::Cart,
        Collection::Orders,
        Collection::Favorites,
    ];

    /// Key of the collection in the JSON document.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Cart => "cart",
            Collection::Orders => "orders",
            Collection::Favorites => "favorites",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
