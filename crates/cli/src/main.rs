//! ERD Studio CLI

fn main() {
    if let Err(e) = erd_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
