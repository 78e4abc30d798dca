#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tourist_registry::run().await
}
