mod app;
mod audio;
mod cart;
mod cli;
mod config;
mod format;
mod handoff;
mod library;
mod notify;
mod page;
mod runtime;
mod storage;
mod ui;

use cli::CliAction;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match cli::parse_args() {
        CliAction::PrintVersion => {
            cli::print_version();
            Ok(())
        }
        CliAction::PrintHelp => {
            cli::print_help();
            Ok(())
        }
        CliAction::PrintCart => runtime::print_cart(),
        CliAction::Run { music_dir } => runtime::run(music_dir.as_deref()),
    }
}
