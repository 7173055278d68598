mod cli;
mod commands;
mod logging;
mod mcp;
mod page_selection;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path, json } => {
            commands::info::run(&path, json)?;
        }
        Commands::Select {
            pages,
            file,
            total,
            json,
        } => {
            let source = match (file, total) {
                (Some(path), _) => commands::select::PageCountSource::File(path),
                (None, Some(total)) => commands::select::PageCountSource::Total(total),
                (None, None) => anyhow::bail!("Pass --file or --total"),
            };
            commands::select::run(&pages, &source, json)?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, &output)?;
        }
        Commands::Merge {
            inputs,
            output,
            pages,
        } => {
            commands::merge::run(&inputs, &pages, &output)?;
        }
        Commands::Split {
            path,
            output_dir,
            groups,
        } => {
            commands::split::run(&path, groups.as_deref().unwrap_or(""), &output_dir)?;
        }
        Commands::Remove {
            path,
            pages,
            output,
        } => {
            commands::remove::run(&path, &pages, &output)?;
        }
        Commands::Rotate {
            path,
            pages,
            angle,
            output,
        } => {
            commands::rotate::run(&path, &pages, angle, &output)?;
        }
        Commands::Reorder {
            path,
            order,
            output,
        } => {
            commands::reorder::run(&path, &order, &output)?;
        }
        Commands::Watermark {
            path,
            text,
            output,
            pages,
            font_size,
            opacity,
        } => {
            let options = pdf::watermark::WatermarkOptions {
                text,
                font_size,
                opacity,
            };
            commands::watermark::run(&path, &pages, &options, &output)?;
        }
        Commands::Protect {
            path,
            output,
            user_password,
            owner_password,
            no_print,
            no_copy,
            no_modify,
            no_annotate,
        } => {
            let options = pdf::protect::ProtectOptions {
                user_password,
                owner_password,
                allow_print: !no_print,
                allow_copy: !no_copy,
                allow_modify: !no_modify,
                allow_annotate: !no_annotate,
            };
            commands::protect::run(&path, &options, &output)?;
        }
    }

    Ok(())
}
