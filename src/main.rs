//! ERD Studio
//!
//! Entity-relationship diagram editor. The `erd-studio` binary is the same
//! command set as `erd`.

fn main() {
    if let Err(e) = erd_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
