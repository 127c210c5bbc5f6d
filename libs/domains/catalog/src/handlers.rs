use axum::Router;
use crud_handlers::{CrudHandlers, nested_router, router as resource_router};
use query_engine::Repository;

use crate::brand::{CreateBrand, UpdateBrand};
use crate::category::{CreateCategory, UpdateCategory};
use crate::product::{CreateProduct, UpdateProduct};
use crate::repositories::Repositories;
use crate::subcategory::{CreateSubCategory, PARENT_FIELD, UpdateSubCategory};
use crate::user::{CreateUser, UpdateUser};
use crate::{brand, category, product, subcategory, user};

/// Catalog routes, relative to the API version prefix.
///
/// `base_url` is the public origin used for image URLs.
pub fn router<R: Repository + 'static>(repositories: &Repositories<R>, base_url: &str) -> Router {
    let subcategories = CrudHandlers::new(
        repositories.subcategories.clone(),
        subcategory::resource(),
    );

    let categories = resource_router::<_, CreateCategory, UpdateCategory>(CrudHandlers::new(
        repositories.categories.clone(),
        category::resource(base_url),
    ))
    .merge(nested_router::<_, CreateSubCategory>(
        subcategories.clone(),
        subcategory::COLLECTION,
        PARENT_FIELD,
    ));

    Router::new()
        .nest("/categories", categories)
        .nest(
            "/subcategories",
            resource_router::<_, CreateSubCategory, UpdateSubCategory>(subcategories),
        )
        .nest(
            "/brands",
            resource_router::<_, CreateBrand, UpdateBrand>(CrudHandlers::new(
                repositories.brands.clone(),
                brand::resource(base_url),
            )),
        )
        .nest(
            "/products",
            resource_router::<_, CreateProduct, UpdateProduct>(CrudHandlers::new(
                repositories.products.clone(),
                product::resource(base_url),
            )),
        )
        .nest(
            "/users",
            resource_router::<_, CreateUser, UpdateUser>(CrudHandlers::new(
                repositories.users.clone(),
                user::resource(base_url),
            )),
        )
}
