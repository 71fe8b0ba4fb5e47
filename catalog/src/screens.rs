use catalog_api::{Product, Session};
use std::fmt::Write;

/// What is currently on screen, with the data it was loaded with.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Products(Vec<Product>),
    ProductDetails(Product),
    ProductForm {
        /// `None` when creating a new product.
        editing: Option<Product>,
        error: Option<String>,
    },
    Login {
        return_to: Option<String>,
        error: Option<String>,
    },
    NotFound(String),
    Error(String),
}

impl Screen {
    pub fn login() -> Self {
        Screen::Login {
            return_to: None,
            error: None,
        }
    }
}

pub fn render(screen: &Screen, session: &Session, notice: Option<&str>) -> String {
    let mut out = String::new();

    let greeting = match session.user {
        Some(ref user) => format!("Welcome, {}", user.display_name()),
        None => "(not logged in)".to_string(),
    };
    writeln!(out, "== Products App ==  {}", greeting).ok();

    if let Some(notice) = notice {
        writeln!(out, "* {}", notice).ok();
    }

    match screen {
        Screen::Products(products) if products.is_empty() => {
            writeln!(out, "No products found.").ok();
        }
        Screen::Products(products) => {
            for product in products {
                writeln!(
                    out,
                    "  [{}] {}  ${:.2}  ({} in stock)",
                    product.id, product.name, product.price, product.stock
                )
                .ok();
            }
        }
        Screen::ProductDetails(product) => {
            writeln!(out, "{}", product.name).ok();
            if let Some(ref description) = product.description {
                writeln!(out, "  {}", description).ok();
            }
            writeln!(out, "  Price: ${:.2}", product.price).ok();
            writeln!(out, "  Stock: {}", product.stock).ok();
        }
        Screen::ProductForm { editing, error } => {
            match editing {
                Some(product) => {
                    writeln!(out, "Edit Product [{}]", product.id).ok();
                    writeln!(out, "  name={}", product.name).ok();
                    writeln!(
                        out,
                        "  description={}",
                        product.description.as_deref().unwrap_or_default()
                    )
                    .ok();
                    writeln!(out, "  price={}", product.price).ok();
                    writeln!(out, "  stock={}", product.stock).ok();
                }
                None => {
                    writeln!(out, "Create New Product").ok();
                }
            }
            if let Some(error) = error {
                writeln!(out, "  ! {}", error).ok();
            }
        }
        Screen::Login { return_to, error } => {
            writeln!(out, "Login").ok();
            if let Some(path) = return_to {
                writeln!(out, "  You need to log in to open {}", path).ok();
            }
            if let Some(error) = error {
                writeln!(out, "  ! {}", error).ok();
            }
        }
        Screen::NotFound(what) => {
            writeln!(out, "Not found: {}", what).ok();
        }
        Screen::Error(message) => {
            writeln!(out, "Error: {}", message).ok();
        }
    }

    out
}
