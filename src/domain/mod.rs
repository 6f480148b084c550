//! Domain model

pub mod cart;

pub use cart::{Cart, CartLine};
