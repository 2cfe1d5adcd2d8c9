#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    jobboard_mcp_server::run().await
}
