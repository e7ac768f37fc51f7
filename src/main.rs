use clap::Parser;

use tally::cli::{self, AccountsCommands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                num,
                institution,
                desc,
                source,
            } => cli::accounts::add(&num, &institution, &desc, &source),
            AccountsCommands::List => cli::accounts::list(),
        },
        Commands::Import { account } => cli::import::run(&account),
        Commands::View {
            table,
            columns,
            filters,
        } => cli::view::run(&table, columns.as_deref(), &filters),
        Commands::Split {
            filters,
            percentage,
            amount,
        } => cli::split::run(&filters, percentage, amount),
        Commands::Edit {
            table,
            sets,
            filters,
        } => cli::edit::run(&table, &sets, &filters),
        Commands::Tag {
            table,
            tag,
            filters,
        } => cli::tag::run(&table, &tag, &filters),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
