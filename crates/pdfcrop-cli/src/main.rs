mod cli;
mod extract_cmd;
mod plan_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Extract(ref args) => extract_cmd::run(args),
        cli::Commands::Plan(ref args) => plan_cmd::run(args),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
