mod classifier;
mod cli;
mod error;
mod fmt;
mod models;
mod movement;
mod numbers;
mod session;
mod settings;
mod table;
mod template;
mod view;
mod week;
mod workbook;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Template { output } => cli::template::run(output),
        Commands::Show {
            file,
            search,
            stocktake,
            json,
        } => cli::show::show(&file, search.as_deref(), stocktake.as_deref(), json),
        Commands::Stats { file } => cli::show::stats(&file),
        Commands::Columns { file } => cli::show::columns(&file),
        Commands::Log {
            file,
            row,
            item,
            used,
            received,
            output,
        } => cli::movement::run(&file, row, item.as_deref(), used.as_deref(), received.as_deref(), output),
        Commands::Edit {
            file,
            row,
            column,
            value,
            output,
        } => cli::edit::edit(&file, row, &column, &value, output),
        Commands::AddRow { file, set, output } => cli::edit::add_row(&file, &set, output),
        Commands::DuplicateRow { file, row, output } => cli::edit::duplicate_row(&file, row, output),
        Commands::DeleteRow { file, row, output } => cli::edit::delete_row(&file, row, output),
        Commands::AddColumn { file, name, output } => cli::edit::add_column(&file, &name, output),
        Commands::RollWeek { file, label, output } => cli::edit::roll_week(&file, label.as_deref(), output),
        Commands::Config {
            sheet_name,
            export_dir,
            relabel_week_on_movement,
        } => cli::config::run(sheet_name, export_dir, relabel_week_on_movement),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
