//! 领域层

pub mod access;
pub mod catalog;
pub mod order;
pub mod repositories;
pub mod services;
pub mod unit_of_work;
pub mod user;
pub mod value_objects;
