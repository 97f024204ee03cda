mod commands;
mod terminal;

use commands::{CommandLine, Commands, check, merge, run};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    match commands.command {
        Commands::Run {
            document,
            output,
            scan,
        } => {
            let cfg = scan.into_config(commands.quiet);
            print::header("starting sweep", cfg.quiet);
            run::run(&document, &output, &cfg).await
        }
        Commands::Check { document } => {
            print::header("checking document", commands.quiet);
            check::check(&document, commands.quiet)
        }
        Commands::Merge {
            document,
            output,
            artifact_dir,
        } => {
            print::header("merging artifacts", commands.quiet);
            merge::merge(&document, &output, &artifact_dir, commands.quiet)
        }
    }
}
