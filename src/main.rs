#[tokio::main]
async fn main() -> std::io::Result<()> {
    paddle_server::run_with_config().await
}
