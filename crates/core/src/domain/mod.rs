pub mod advice;
pub mod product;
pub mod profile;
