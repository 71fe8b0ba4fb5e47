use crate::endpoints::{
    Id,
    auth::{Login, LoginCredentials, Logout},
    products::{CreateProduct, DeleteProduct, GetProduct, ListProducts, ProductFields, UpdateProduct},
};

pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListProducts {
        ListProducts
    }

    pub fn get(&self, id: &Id) -> GetProduct {
        GetProduct::new(id.clone())
    }

    pub fn create(&self, fields: ProductFields) -> CreateProduct {
        CreateProduct::new(fields)
    }

    pub fn update(&self, id: &Id, fields: ProductFields) -> UpdateProduct {
        UpdateProduct::new(id.clone(), fields)
    }

    pub fn delete(&self, id: &Id) -> DeleteProduct {
        DeleteProduct::new(id.clone())
    }
}

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn login<'a>(&self, credentials: &'a LoginCredentials) -> Login<'a> {
        Login::new(credentials)
    }

    pub fn logout(&self) -> Logout {
        Logout
    }
}
