/// Everything the user can ask the front-end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Open(String),
    Login { email: String, password: String },
    Logout,
    /// `field=value` assignments applied to the product form, then submitted.
    Save(Vec<(String, String)>),
    Delete,
    WhoAmI,
    Help,
    Quit,
}
