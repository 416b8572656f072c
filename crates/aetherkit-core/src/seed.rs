//! Built-in starter templates

use crate::db::{
    Database, SettingsRepository, SqliteSettingsRepository, SqliteTemplateRepository,
    TemplateRepository, TemplateStore,
};
use crate::error::Result;
use crate::models::{Settings, Template, TemplateCategory, TemplateId};
use crate::util::now_millis;

/// A starter template shipped with the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTemplate {
    pub name: &'static str,
    pub category: TemplateCategory,
    pub content: &'static str,
}

pub const SEED_TEMPLATES: [SeedTemplate; 3] = [
    SeedTemplate {
        name: "Receipt - Simple",
        category: TemplateCategory::Receipt,
        content: "Thanks {guest} ✨\nOrder: {items}\nTotal: {total} gil\nPay to: {pay_to}",
    },
    SeedTemplate {
        name: "Event - PF Listing",
        category: TemplateCategory::Event,
        content: "{venue} | {time} | {world}\nVibe: {vibe}\nCome chill ✨",
    },
    SeedTemplate {
        name: "RP - Greeting",
        category: TemplateCategory::Rp,
        content: "*smiles softly* Welcome to {venue}, {guest}. Make yourself comfortable ✨",
    },
];

impl SeedTemplate {
    fn to_template(self, now: i64) -> Template {
        Template {
            id: TemplateId::new(),
            name: self.name.to_string(),
            category: self.category,
            content: self.content.to_string(),
            favorite: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Insert the starter templates and default settings into an empty store.
///
/// Returns the number of templates added; 0 when any template already exists.
pub fn ensure_seeded(db: &mut Database) -> Result<usize> {
    ensure_seeded_at(db, now_millis())
}

fn ensure_seeded_at(db: &mut Database, now: i64) -> Result<usize> {
    let tx = db.connection_mut().transaction()?;
    let seeded = {
        let templates = SqliteTemplateRepository::new(&tx);
        if templates.count()? > 0 {
            tracing::debug!("Template store already populated, skipping seed");
            return Ok(0);
        }

        for seed in SEED_TEMPLATES {
            templates.add(&seed.to_template(now))?;
        }
        SqliteSettingsRepository::new(&tx).save(&Settings::default())?;
        SEED_TEMPLATES.len()
    };
    tx.commit()?;

    tracing::info!("Seeded {seeded} starter templates");
    Ok(seeded)
}
