//! 商品目录聚合

mod product;

pub use product::Product;
