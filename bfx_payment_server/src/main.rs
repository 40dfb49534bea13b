use bfx_payment_server::{config::ServerConfig, server::run_server};
use log::*;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let config = match ServerConfig::try_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("🚀️ {e}");
            std::process::exit(1);
        },
    };
    info!("🚀️ Starting Bitfinex Pay gateway server");
    if let Err(e) = run_server(config).await {
        error!("🚀️ Server terminated abnormally. {e}");
        std::process::exit(1);
    }
}
