// Idempotent application import

use super::ManagementClient;
use crate::error::{LuisError, Result};
use crate::types::{ImportAppOptions, ListOptions};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::info;

lazy_static! {
    static ref APP_EXISTS_REGEX: Regex = Regex::new(r"^.+ already exists\.$").unwrap();
}

/// True only for the service's whole-message "<name> already exists." conflict
pub fn is_app_exists_error(error: &LuisError) -> bool {
    match error {
        LuisError::Request { message, .. } => APP_EXISTS_REGEX.is_match(message),
        _ => false,
    }
}

impl ManagementClient {
    /// Import an application, or return the id of the existing
    /// application with the same name.
    ///
    /// App names are assumed unique per account; the first listed app
    /// whose `name` matches wins. Import failures other than the
    /// name conflict are returned unchanged.
    pub async fn try_import_app(&self, application: &Value) -> Result<String> {
        match self
            .import_app(application, ImportAppOptions::default())
            .await
        {
            Ok(response) => {
                let app_id = response.body_str()?.to_string();
                info!(app_id = %app_id, "Application imported");
                Ok(app_id)
            }
            Err(e) if is_app_exists_error(&e) => {
                let name = application.get("name").and_then(Value::as_str);
                info!(name = ?name, "Application already exists, looking it up");

                let apps = self.list_user_apps(ListOptions::default()).await?.apps()?;
                let existing = name.and_then(|name| apps.into_iter().find(|app| app.name == name));
                match existing {
                    Some(app) => {
                        info!(app_id = %app.id, "Reusing existing application");
                        Ok(app.id)
                    }
                    None => Err(LuisError::AppNotFound),
                }
            }
            Err(e) => Err(e),
        }
    }
}
