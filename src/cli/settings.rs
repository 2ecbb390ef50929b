use anyhow::Result;

use crate::cli::ui;
use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::db::Database;

pub fn run_config(db: &Database, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = Config::load(db)?;
            print!("{}", render_config(&config));
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            Config::set(db, &key, &value)?;
            ui::status(&format!("Set {}", key));
            Ok(())
        }
        ConfigCommand::Unset { key } => {
            if Config::unset(db, &key)? {
                ui::status(&format!("Cleared {}", key));
            } else {
                ui::status(&format!("{} was not set", key));
            }
            Ok(())
        }
    }
}

fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= 8 {
        return "****".to_string();
    }
    let tail: String = token.chars().skip(len - 4).collect();
    format!("****{}", tail)
}

fn render_config(config: &Config) -> String {
    let unset = "(not set)".to_string();
    let rows = [
        ("api_url", config.api_url.clone().unwrap_or_else(|| unset.clone())),
        ("api_token", config.api_token.as_deref().map(mask_token).unwrap_or_else(|| unset.clone())),
        ("tenant_id", config.tenant_id.clone()),
        ("role", config.role.as_str().to_string()),
        ("user", config.user.clone().unwrap_or_else(|| unset.clone())),
    ];
    let mut out = String::new();
    for (key, value) in rows {
        out.push_str(&format!("{:<10} {}\n", key, value));
    }
    out
}
