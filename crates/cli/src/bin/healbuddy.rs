use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    healbuddy_cli::main_entry().await
}
