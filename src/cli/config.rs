use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(
    sheet_name: Option<String>,
    export_dir: Option<String>,
    relabel_week_on_movement: Option<bool>,
) -> Result<()> {
    let mut settings = load_settings();
    let changed = sheet_name.is_some() || export_dir.is_some() || relabel_week_on_movement.is_some();

    if let Some(name) = sheet_name {
        settings.sheet_name = name;
    }
    if let Some(dir) = export_dir {
        // An empty value goes back to writing next to the source file.
        settings.export_dir = Some(dir).filter(|d| !d.trim().is_empty());
    }
    if let Some(relabel) = relabel_week_on_movement {
        settings.relabel_week_on_movement = relabel;
    }
    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Sheet name:               {}", settings.sheet_name);
    println!(
        "Export directory:         {}",
        settings.export_dir.as_deref().unwrap_or("(next to the source file)")
    );
    println!("Relabel week on movement: {}", settings.relabel_week_on_movement);
    Ok(())
}
