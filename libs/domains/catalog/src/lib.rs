//! Catalog Domain
//!
//! Categories, subcategories, brands, products and users served through the
//! generic CRUD handlers.
//!
//! ```text
//! /categories                     Category
//! /categories/{id}/subcategories  SubCategory scoped to a category
//! /subcategories                  SubCategory (category populated on reads)
//! /brands                         Brand
//! /products                       Product (category populated on reads)
//! /users                          User (password hashed, never returned)
//! ```
//!
//! Each resource module declares its storage schema, its
//! [`ResourceDef`](crud_handlers::ResourceDef) and validated create/update
//! payloads.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{Repositories, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repositories = Repositories::mongo(&client.database("catalog"));
//! repositories.init_indexes().await?;
//!
//! let router = handlers::router(&repositories, "http://localhost:8080");
//! # Ok(())
//! # }
//! ```

pub mod brand;
pub mod category;
pub mod handlers;
pub mod product;
pub mod repositories;
pub mod subcategory;
pub mod user;
pub mod validation;

pub use brand::{CreateBrand, UpdateBrand};
pub use category::{CreateCategory, UpdateCategory};
pub use product::{CreateProduct, UpdateProduct};
pub use repositories::Repositories;
pub use subcategory::{CreateSubCategory, UpdateSubCategory};
pub use user::{CreateUser, Role, UpdateUser};
