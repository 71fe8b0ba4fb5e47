use std::sync::Arc;

use catalog_api::{CatalogApiError, Client, DEFAULT_BASE_URL, LoginCredentials, MemoryCredentials, ProductFields};

#[tokio::main]
pub async fn main() -> Result<(), CatalogApiError> {
    let client = Client::new(DEFAULT_BASE_URL, Arc::new(MemoryCredentials::new()));

    client
        .login(&LoginCredentials::new("admin@example.com", "secret"))
        .await?;

    let created = client
        .create_product(ProductFields::new("Widget", "A widget", "9.99", 3))
        .await?;
    let _all = client.list_products().await?;
    client.delete_product(&created.id).await?;

    client.logout().await?;
    Ok(())
}
