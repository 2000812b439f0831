//! Domain models for storefront.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartLine, VariantKey};
pub use session::CurrentUser;
