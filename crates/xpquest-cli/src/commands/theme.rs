use clap::Subcommand;
use serde_json::json;
use xpquest_core::storage::data_dir;
use xpquest_core::theme::CssTarget;
use xpquest_core::{Config, ThemeApplier, ThemeCatalog, ThemeSource};

use super::{open_game, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List catalog themes with ownership
    List,
    /// Spend XP to unlock a theme
    Unlock {
        /// Theme ID
        id: String,
        /// XP price; defaults to the catalog's cost
        #[arg(long)]
        cost: Option<u64>,
    },
    /// Activate an unlocked theme
    Use {
        /// Theme ID
        id: String,
    },
    /// Print a theme as a CSS :root block
    Css {
        /// Theme ID
        id: String,
    },
}

fn load_catalog(config: &Config) -> Result<ThemeCatalog, Box<dyn std::error::Error>> {
    let source = ThemeSource::parse(&config.themes.source, &data_dir()?);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(ThemeCatalog::load(&source)))
}

pub fn run(action: ThemeAction) -> CmdResult {
    let config = Config::load()?;

    match action {
        ThemeAction::List => {
            let catalog = load_catalog(&config)?;
            let game = open_game(&config)?;
            let progress = game.progress();
            let rows: Vec<serde_json::Value> = catalog
                .themes()
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "name": t.display_name(),
                        "description": t.description,
                        "cost": t.cost,
                        "unlocked": progress.has_theme(&t.id),
                        "active": progress.active_theme == t.id,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        ThemeAction::Unlock { id, cost } => {
            let cost = match cost {
                Some(cost) => cost,
                None => load_catalog(&config)?
                    .get(&id)
                    .and_then(|t| t.cost)
                    .ok_or_else(|| format!("no cost known for theme {id}; pass --cost"))?,
            };
            let mut game = open_game(&config)?;
            let outcome = game.unlock_theme(&id, cost)?;
            print_json(&outcome)?;
        }
        ThemeAction::Use { id } => {
            let mut game = open_game(&config)?;
            if !game.set_active_theme(&id)? {
                return Err(format!("theme {id} is not unlocked").into());
            }
            println!("active theme: {id}");
        }
        ThemeAction::Css { id } => {
            let catalog = load_catalog(&config)?;
            let mut applier = ThemeApplier::new();
            let mut css = CssTarget::default();
            if !applier.apply(&catalog, &id, &mut css) {
                return Err(format!("theme not in catalog: {id}").into());
            }
            print!("{}", css.to_css());
        }
    }
    Ok(())
}
