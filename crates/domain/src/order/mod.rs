//! Cart and order types.

mod cart;
mod document;

pub use cart::{Cart, CartLine};
pub use document::{Order, OrderDocument};
