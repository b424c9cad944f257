use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    browsercli::cli::run().await
}
