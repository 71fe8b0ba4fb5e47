use super::{Id, Method, Numeric, Request, RequestData};
use crate::macros::setter;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price. Some endpoints send decimals as strings.
    #[serde(deserialize_with = "decimal")]
    pub price: f64,
    #[serde(deserialize_with = "count")]
    pub stock: u64,
    /// Anything else the server sent (timestamps, owner, ...), kept verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Editable fields of a product, sent on create and update.
///
/// No validation happens here; the server decides what it accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Numeric,
    pub stock: Numeric,
}

impl ProductFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<Numeric>,
        stock: impl Into<Numeric>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: price.into(),
            stock: stock.into(),
        }
    }

    setter!(name: String);
    setter!(description: String);
    setter!(price: Numeric);
    setter!(stock: Numeric);
}

impl From<&Product> for ProductFields {
    fn from(product: &Product) -> Self {
        Self::new(
            product.name.clone(),
            product.description.clone().unwrap_or_default(),
            product.price,
            product.stock,
        )
    }
}

// Requests

#[derive(Debug, Clone, Default)]
pub struct ListProducts;

impl Request for ListProducts {
    type Data = ();
    type Response = Vec<Product>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/products".into()
    }
}

#[derive(Debug, Clone)]
pub struct GetProduct {
    id: Id,
}

impl GetProduct {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

impl Request for GetProduct {
    type Data = ();
    type Response = Product;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/products/{}", self.id).into()
    }
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    fields: ProductFields,
}

impl CreateProduct {
    pub fn new(fields: ProductFields) -> Self {
        Self { fields }
    }
}

impl Request for CreateProduct {
    type Data = ProductFields;
    type Response = Product;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/products".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.fields)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProduct {
    id: Id,
    fields: ProductFields,
}

impl UpdateProduct {
    pub fn new(id: Id, fields: ProductFields) -> Self {
        Self { id, fields }
    }
}

impl Request for UpdateProduct {
    type Data = ProductFields;
    type Response = Product;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/products/{}", self.id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.fields)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProduct {
    id: Id,
}

impl DeleteProduct {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

impl Request for DeleteProduct {
    type Data = ();
    /// Usually 204; whatever body comes back is not inspected.
    type Response = IgnoredAny;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/products/{}", self.id).into()
    }
}
