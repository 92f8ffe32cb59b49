//! 邮件模板系统

use mall_errors::{AppError, AppResult};
use std::collections::HashMap;
use tera::Tera;
use tracing::debug;

/// 邮件模板管理器
pub struct EmailTemplate {
    tera: Tera,
}

impl EmailTemplate {
    /// 创建新的模板管理器
    pub fn new(template_dir: &str) -> AppResult<Self> {
        let pattern = format!("{}/**/*.html", template_dir);
        let tera = Tera::new(&pattern)
            .map_err(|e| AppError::internal(format!("Failed to load email templates: {}", e)))?;

        debug!(template_dir = %template_dir, "Email templates loaded");

        Ok(Self { tera })
    }

    /// 从内存中的模板字符串创建（用于测试）
    pub fn from_strings(templates: HashMap<String, String>) -> AppResult<Self> {
        let mut tera = Tera::default();

        for (name, content) in templates {
            tera.add_raw_template(&name, &content).map_err(|e| {
                AppError::internal(format!("Failed to add template {}: {}", name, e))
            })?;
        }

        Ok(Self { tera })
    }

    /// 渲染模板
    pub fn render(&self, template_name: &str, context: &serde_json::Value) -> AppResult<String> {
        let context = tera::Context::from_serialize(context)
            .map_err(|e| AppError::internal(format!("Failed to create template context: {}", e)))?;

        self.tera.render(template_name, &context).map_err(|e| {
            AppError::internal(format!(
                "Failed to render template {}: {}",
                template_name, e
            ))
        })
    }

    /// 渲染邮箱验证邮件
    pub fn render_verification(
        &self,
        user_name: &str,
        verify_link: &str,
        expires_in_hours: u32,
    ) -> AppResult<String> {
        let mut context = tera::Context::new();
        context.insert("user_name", user_name);
        context.insert("verify_link", verify_link);
        context.insert("expires_in_hours", &expires_in_hours);

        self.tera
            .render("verification.html", &context)
            .map_err(|e| AppError::internal(format!("Failed to render HTML template: {}", e)))
    }

    /// 渲染密码重置邮件
    pub fn render_password_reset(
        &self,
        user_name: &str,
        reset_link: &str,
        expires_in_minutes: u32,
    ) -> AppResult<String> {
        let mut context = tera::Context::new();
        context.insert("user_name", user_name);
        context.insert("reset_link", reset_link);
        context.insert("expires_in_minutes", &expires_in_minutes);

        self.tera
            .render("password_reset.html", &context)
            .map_err(|e| AppError::internal(format!("Failed to render HTML template: {}", e)))
    }
}
