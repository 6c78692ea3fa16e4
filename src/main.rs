use std::process;

fn main() {
    if let Err(e) = rsa_key::cli::app::create_app() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
