use askama::Template;

use super::PageContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub ctx: PageContext,
    pub settings: Vec<crate::models::setting::SettingDisplay>,
}

/// Standalone error page for the access-denied / missing-parameter /
/// record-not-found taxonomy. Rendered outside any session context.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPageTemplate {
    pub message: String,
}
