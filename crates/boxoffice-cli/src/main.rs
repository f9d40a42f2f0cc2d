#[tokio::main]
async fn main() {
    let code = boxoffice_cli::run().await;
    std::process::exit(code);
}
