#[tokio::main]
async fn main() {
    if let Err(e) = calltrack::cli::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
