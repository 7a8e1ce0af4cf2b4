use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    clipdeck_server::init_tracing();

    if let Err(error) = clipdeck_server::run().await {
        error!("Server exited with error: {}", error);
        std::process::exit(1);
    }
}
