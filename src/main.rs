use routewarden::cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; config is read from the environment after this.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    run_cli().await
}
