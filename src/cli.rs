use std::env;
use std::path::PathBuf;

pub enum CliAction {
    PrintVersion,
    PrintHelp,
    /// Print the persisted cart as checkout-table markup.
    PrintCart,
    /// Start the terminal storefront, optionally adding a music directory.
    Run { music_dir: Option<PathBuf> },
}

pub fn parse_args() -> CliAction {
    parse(env::args().skip(1))
}

fn parse(args: impl Iterator<Item = String>) -> CliAction {
    let mut music_dir = None;
    for arg in args {
        match arg.as_str() {
            "--version" | "-V" => return CliAction::PrintVersion,
            "--help" | "-h" => return CliAction::PrintHelp,
            "--print-cart" => return CliAction::PrintCart,
            a if a.starts_with('-') => {
                eprintln!("stagefront: ignoring unknown option {a}");
            }
            _ => music_dir = Some(PathBuf::from(arg)),
        }
    }
    CliAction::Run { music_dir }
}

pub fn print_version() {
    println!("stagefront v{}", env!("CARGO_PKG_VERSION"));
}

pub fn print_help() {
    println!(
        "usage: stagefront [MUSIC_DIR]\n       stagefront --print-cart\n\n\
         MUSIC_DIR      extra tracks appended after the page's albums\n\
         --print-cart   print the saved cart as HTML and exit\n\
         -V, --version  print version\n\
         -h, --help     print this help"
    );
}
