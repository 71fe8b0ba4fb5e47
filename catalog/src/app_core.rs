use catalog_api::{CatalogApiError, Client, LoginCredentials, Product, ProductFields, Session};
use catalog_auth::{Navigation, RouteGuard};
use tracing::{debug, info, warn};

use crate::commands::HELP;
use crate::events::AppCommand;
use crate::routes::Route;
use crate::screens::{self, Screen};

/// A view may send the user elsewhere (failed edit load); bound the chain.
const MAX_REDIRECTS: usize = 3;

/// Application core without terminal I/O.
///
/// Owns the current location and screen; every view change goes through
/// [`AppCore::navigate`], which consults the route guard.
pub struct AppCore {
    client: Client,
    guard: RouteGuard,
    location: String,
    screen: Screen,
    notice: Option<String>,
    should_quit: bool,
}

enum Visit {
    Shown,
    Redirect(String),
}

impl AppCore {
    pub fn new(client: Client, guard: RouteGuard) -> Self {
        Self {
            client,
            guard,
            location: "/".to_string(),
            screen: Screen::Products(Vec::new()),
            notice: None,
            should_quit: false,
        }
    }

    pub async fn execute(&mut self, command: AppCommand) {
        debug!(?command, "Executing command");
        self.notice = None;

        match command {
            AppCommand::Open(path) => self.navigate(&path).await,
            AppCommand::Login { email, password } => self.login(email, password).await,
            AppCommand::Logout => self.logout().await,
            AppCommand::Save(assignments) => self.save(assignments).await,
            AppCommand::Delete => self.delete().await,
            AppCommand::WhoAmI => {
                self.notice = Some(match self.session().user {
                    Some(user) => format!("Logged in as {} (id {})", user.email, user.id),
                    None => "Not logged in".to_string(),
                });
            }
            AppCommand::Help => self.notice = Some(HELP.to_string()),
            AppCommand::Quit => self.should_quit = true,
        }
    }

    pub async fn navigate(&mut self, path: &str) {
        let mut target = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.visit(&target).await {
                Visit::Shown => return,
                Visit::Redirect(next) => target = next,
            }
        }
        warn!(%path, "Too many redirects");
        self.show(target, Screen::Error("Too many redirects".to_string()));
    }

    async fn visit(&mut self, path: &str) -> Visit {
        let Some(route) = Route::parse(path) else {
            self.show(path.to_string(), Screen::NotFound(path.to_string()));
            return Visit::Shown;
        };
        let destination = route.to_string();

        if route.is_protected() {
            if let Navigation::Redirected { to, from } =
                self.guard.check(self.client.session(), &destination)
            {
                self.show(
                    to,
                    Screen::Login {
                        return_to: Some(from),
                        error: None,
                    },
                );
                return Visit::Shown;
            }
        }

        let screen = match route {
            Route::Products => match self.client.list_products().await {
                Ok(products) => Screen::Products(products),
                Err(e) => return self.fail(&destination, e),
            },
            Route::ProductDetails(ref id) => match self.client.get_product(id).await {
                Ok(product) => Screen::ProductDetails(product),
                Err(e) if e.is_not_found() => Screen::NotFound(format!("product {}", id)),
                Err(e) => return self.fail(&destination, e),
            },
            Route::NewProduct => Screen::ProductForm {
                editing: None,
                error: None,
            },
            Route::EditProduct(ref id) => match self.client.get_product(id).await {
                Ok(product) => Screen::ProductForm {
                    editing: Some(product),
                    error: None,
                },
                Err(e) if e.is_unauthorized() => return self.fail(&destination, e),
                Err(e) => {
                    warn!(%id, error = %e, "Failed to load product for editing");
                    self.notice = Some(format!("Could not load product {}: {}", id, e));
                    return Visit::Redirect("/".to_string());
                }
            },
            Route::Login => Screen::login(),
        };

        self.show(destination, screen);
        Visit::Shown
    }

    /// Show a failed load. A rejected credential sends the user to log in
    /// and come back here afterwards.
    fn fail(&mut self, destination: &str, error: CatalogApiError) -> Visit {
        if error.is_unauthorized() {
            self.notice = Some("Your session has ended, please log in again".to_string());
            self.show(
                self.guard.login_path().to_string(),
                Screen::Login {
                    return_to: Some(destination.to_string()),
                    error: None,
                },
            );
        } else {
            self.show(destination.to_string(), Screen::Error(error.to_string()));
        }
        Visit::Shown
    }

    fn show(&mut self, location: String, screen: Screen) {
        self.location = location;
        self.screen = screen;
    }

    async fn login(&mut self, email: String, password: String) {
        let return_to = match self.screen {
            Screen::Login { ref return_to, .. } => return_to.clone(),
            _ => None,
        };

        let credentials = LoginCredentials::new(email, password);
        match self.client.login(&credentials).await {
            Ok(user) => {
                info!(user = %user.email, "Login succeeded");
                self.navigate(return_to.as_deref().unwrap_or("/")).await;
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = match e {
                    CatalogApiError::Unauthorized { .. } => "Invalid credentials".to_string(),
                    ref other => other
                        .message()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| format!("Login failed: {}", other)),
                };
                self.show(
                    self.guard.login_path().to_string(),
                    Screen::Login {
                        return_to,
                        error: Some(message),
                    },
                );
            }
        }
    }

    async fn logout(&mut self) {
        if self.client.logout().await.is_err() {
            self.notice = Some("Logged out locally; the server could not be told".to_string());
        }
        let login_path = self.guard.login_path().to_string();
        self.navigate(&login_path).await;
    }

    async fn save(&mut self, assignments: Vec<(String, String)>) {
        let Screen::ProductForm { ref editing, .. } = self.screen else {
            self.notice = Some("Nothing to save here; open a product form first".to_string());
            return;
        };
        let editing = editing.clone();

        let fields = match apply_assignments(editing.as_ref(), assignments) {
            Ok(fields) => fields,
            Err(message) => {
                self.set_form_error(message);
                return;
            }
        };

        let result = match editing {
            Some(ref product) => self.client.update_product(&product.id, fields).await,
            None => self.client.create_product(fields).await,
        };

        match result {
            Ok(product) => {
                info!(id = %product.id, "Product saved");
                self.navigate("/").await;
                self.notice = Some(format!("Saved {}", product.name));
            }
            Err(e) if e.is_unauthorized() => {
                let location = self.location.clone();
                self.fail(&location, e);
            }
            Err(CatalogApiError::ValidationRejected {
                message, errors, ..
            }) => {
                let mut text = message.unwrap_or_else(|| "The product was rejected".to_string());
                for (field, messages) in errors {
                    text.push_str(&format!("; {}: {}", field, messages.join(", ")));
                }
                self.set_form_error(text);
            }
            Err(e) => self.set_form_error(e.to_string()),
        }
    }

    fn set_form_error(&mut self, message: String) {
        if let Screen::ProductForm { ref mut error, .. } = self.screen {
            *error = Some(message);
        }
    }

    async fn delete(&mut self) {
        let Screen::ProductDetails(ref product) = self.screen else {
            self.notice = Some("Open a product before deleting it".to_string());
            return;
        };
        let product = product.clone();

        match self.client.delete_product(&product.id).await {
            Ok(()) => {
                info!(id = %product.id, "Product deleted");
                self.navigate("/").await;
                self.notice = Some(format!("Deleted {}", product.name));
            }
            Err(e) if e.is_unauthorized() => {
                let location = self.location.clone();
                self.fail(&location, e);
            }
            Err(e) => self.notice = Some(format!("Could not delete: {}", e)),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn session(&self) -> Session {
        self.client.session().current()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn render(&self) -> String {
        screens::render(&self.screen, &self.session(), self.notice())
    }
}

/// Start from the product being edited (or blank) and apply the user's
/// `field=value` pairs. Values are passed through as typed.
fn apply_assignments(
    editing: Option<&Product>,
    assignments: Vec<(String, String)>,
) -> Result<ProductFields, String> {
    let mut fields = editing
        .map(ProductFields::from)
        .unwrap_or_else(|| ProductFields::new("", "", "", ""));

    for (field, value) in assignments {
        fields = match field.as_str() {
            "name" => fields.name(value),
            "description" => fields.description(value),
            "price" => fields.price(value),
            "stock" => fields.stock(value),
            other => return Err(format!("Unknown field '{}'", other)),
        };
    }

    Ok(fields)
}
