use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chiatien::config::Config;
use chiatien::ledger::ExpenseLedger;
use chiatien::routes;
use chiatien::store::{ExpenseRepository, InMemoryExpenseRepository, MongoExpenseRepository};
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chiatien=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

fn startup_error(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logger();
    let config = Config::from_env().map_err(startup_error)?;

    let repository: Box<dyn ExpenseRepository> = match &config.mongodb_uri {
        Some(uri) => {
            let repository = MongoExpenseRepository::connect(uri, &config.database_name)
                .await
                .map_err(startup_error)?;
            info!(database = %config.database_name, "using MongoDB");
            Box::new(repository)
        }
        None => {
            warn!("MONGODB_URI is not set, expenses will only be kept in memory");
            Box::new(InMemoryExpenseRepository::default())
        }
    };
    let ledger = web::Data::new(ExpenseLedger::load(repository).await.map_err(startup_error)?);

    info!(address = %config.bind_address, port = config.port, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(ledger.clone())
            .configure(routes::configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
