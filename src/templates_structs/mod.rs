// Template context structures for Askama templates, organized by domain.
// All types are re-exported: `use campus::templates_structs::*`

use actix_session::Session;
use sqlx::SqlitePool;

use crate::auth::csrf;
use crate::auth::session::{Permissions, get_permissions, get_username, take_flash};
use crate::errors::AppError;
use crate::models::setting;

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.app_name`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub permissions: Permissions,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub async fn build(session: &Session, pool: &SqlitePool) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let permissions = get_permissions(session)
            .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;
        let flash = take_flash(session);
        let app_name = setting::get_value(pool, "app.name", "Campus").await;
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            permissions,
            flash,
            app_name,
            csrf_token,
        })
    }
}

mod common;
mod template;

pub use self::common::{ErrorPageTemplate, LoginTemplate, SettingsTemplate};
pub use self::template::{
    FormPageTemplate, SectionTableView, TemplateBuilderTemplate, TemplateListTemplate,
};
