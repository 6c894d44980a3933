//! Domain models and JSON response shapes.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use order::{Order, OrderItem};
pub use product::Product;
pub use user::{User, UserProfile};
