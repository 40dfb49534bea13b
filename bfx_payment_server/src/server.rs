use actix_web::{middleware::Logger, web, App, HttpServer};
use bfx_payment_engine::{
    traits::{NotificationSink, OrderStore},
    MemoryOrderStore, StatusApplier,
};
use bfx_tools::{BfxPayApi, PaymentProcessor};
use log::*;

use crate::{
    config::{PaymentOptions, ServerConfig},
    errors::ServerError,
    notifier::LogNotifier,
    routes::{bitfinex_webhook, checkout, health},
    sweep_worker::start_sweep_worker,
};

/// Wire up the production collaborators and run the server until it is shut down.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let processor = BfxPayApi::new(config.bfx.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let store = MemoryOrderStore::new();
    let sweep_applier = StatusApplier::new(store.clone(), LogNotifier);
    let sweep_handle = start_sweep_worker(processor.clone(), sweep_applier, config.poll_interval);
    let srv = create_server_instance(&config, processor, store, LogNotifier)?;
    let result = srv.await.map_err(ServerError::from);
    sweep_handle.abort();
    result
}

/// Build the HTTP server over any combination of collaborators. The endpoint tests call this with mocks.
pub fn create_server_instance<P, S, N>(
    config: &ServerConfig,
    processor: P,
    store: S,
    sink: N,
) -> Result<actix_web::dev::Server, ServerError>
where
    P: PaymentProcessor + Clone + Send + Sync + 'static,
    S: OrderStore + Clone + Send + Sync + 'static,
    N: NotificationSink + Clone + Send + Sync + 'static,
{
    let host = config.host.clone();
    let port = config.port;
    let payment_options = config.payment.clone();
    let srv = HttpServer::new(move || {
        let applier = StatusApplier::new(store.clone(), sink.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bpg::access_log"))
            .app_data(web::Data::new(processor.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(applier))
            .app_data(web::Data::new(payment_options.clone()))
            .service(health)
            .route("/checkout/{order_id}", web::post().to(checkout::<P, S>))
            .route("/webhook/bitfinex", web::post().to(bitfinex_webhook::<P, S, N>))
    })
    .keep_alive(std::time::Duration::from_secs(600))
    .bind((host.as_str(), port))?
    .run();
    info!("🚀️ Server is running on {host}:{port}");
    Ok(srv)
}

/// Build an [`actix_web::App`]-compatible configuration closure for tests that want an in-process service rather
/// than a bound socket.
pub fn configure_routes<P, S, N>(
    processor: P,
    store: S,
    sink: N,
    payment_options: PaymentOptions,
) -> impl FnOnce(&mut web::ServiceConfig)
where
    P: PaymentProcessor + 'static,
    S: OrderStore + Clone + 'static,
    N: NotificationSink + 'static,
{
    move |cfg: &mut web::ServiceConfig| {
        let applier = StatusApplier::new(store.clone(), sink);
        cfg.app_data(web::Data::new(processor))
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(applier))
            .app_data(web::Data::new(payment_options))
            .service(health)
            .route("/checkout/{order_id}", web::post().to(checkout::<P, S>))
            .route("/webhook/bitfinex", web::post().to(bitfinex_webhook::<P, S, N>));
    }
}
