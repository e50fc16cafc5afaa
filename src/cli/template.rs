use crate::cli::save;
use crate::error::Result;
use crate::session::Session;
use crate::settings::load_settings;

/// Without `--output` the template lands in the export directory, else the
/// current directory.
pub fn run(output: Option<String>) -> Result<()> {
    let mut session = Session::new(load_settings());
    session.start_template();
    save(&mut session, None, output)?;
    println!("Next week:  {}", session.next_week_label());
    Ok(())
}
