//! 도메인 모델.

mod identity;
mod product;

pub use identity::{Identity, Role};
pub use product::{NewProduct, Product};
