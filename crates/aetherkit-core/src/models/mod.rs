//! Data models for AetherKit

mod settings;
mod template;
mod usage;

pub use settings::{Language, Settings};
pub use template::{
    NewTemplate, ParseCategoryError, Template, TemplateCategory, TemplateId, TemplatePatch,
    CONTENT_MAX_CHARS, NAME_MAX_CHARS,
};
pub use usage::TemplateUsage;
