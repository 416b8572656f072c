use std::path::Path;

use crate::commands::common::{
    format_timestamp, normalize_template_identifier, open_database, resolve_template,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_template_identifier(id)?;
    let db = open_database(db_path).await?;
    let template = resolve_template(&normalized_id, &db).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    let last_used = db.last_used(&template.id).await?;

    println!("{}", template.name);
    println!("id:        {}", template.id);
    println!("category:  {}", template.category);
    println!("favorite:  {}", if template.favorite { "yes" } else { "no" });
    println!("updated:   {}", format_timestamp(template.updated_at));
    if let Some(last_used) = last_used {
        println!("last used: {}", format_timestamp(last_used));
    }
    let tokens = template.tokens();
    if !tokens.is_empty() {
        println!("tokens:    {}", tokens.join(", "));
    }
    println!();
    println!("{}", template.content);
    Ok(())
}
