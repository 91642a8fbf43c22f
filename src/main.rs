use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    robobench::cli::run().await
}
