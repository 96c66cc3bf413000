mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{ast, print, AstArgs, PrintArgs};

/// Reprint CLI - print syntax trees back to source, keeping the original layout
#[derive(Parser, Debug)]
#[command(name = "reprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file (or read a JSON tree) and print it
    Print(PrintArgs),

    /// Dump the syntax tree of a file as JSON
    Ast(AstArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Print(args) => print(args, &cwd),
                Command::Ast(args) => ast(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
