//! Template usage model

use serde::{Deserialize, Serialize};

use super::TemplateId;

/// Last time a template was rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUsage {
    pub template_id: TemplateId,
    /// Unix ms
    pub last_used_at: i64,
}
