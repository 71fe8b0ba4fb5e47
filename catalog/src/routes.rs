use catalog_api::Id;
use std::fmt::Display;

/// Every view the front-end can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Products,
    ProductDetails(Id),
    NewProduct,
    EditProduct(Id),
    Login,
}

impl Route {
    /// Map a path to a route. Query strings and trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Products),
            ["login"] => Some(Route::Login),
            ["products", "new"] => Some(Route::NewProduct),
            ["products", "edit", id] => id.parse().ok().map(Route::EditProduct),
            // "edit" without an id is not a product called "edit".
            ["products", "edit"] => None,
            ["products", id] => id.parse().ok().map(Route::ProductDetails),
            _ => None,
        }
    }

    /// Views that need a logged-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::NewProduct | Route::EditProduct(_))
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Products => f.write_str("/"),
            Route::ProductDetails(id) => write!(f, "/products/{}", id),
            Route::NewProduct => f.write_str("/products/new"),
            Route::EditProduct(id) => write!(f, "/products/edit/{}", id),
            Route::Login => f.write_str("/login"),
        }
    }
}
