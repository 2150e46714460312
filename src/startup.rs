use crate::configuration::{DatabaseSettings, SecretSetting, Settings, StripeSetting};
use crate::email_client::{GenericEmailService, SmtpEmailClient};
use crate::routes::main_route;
use crate::stripe_client::StripeClient;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let email_client = Arc::new(
            SmtpEmailClient::new(&configuration.email_client)
                .expect("Failed to create SmtpEmailClient"),
        ) as Arc<dyn GenericEmailService>;
        let stripe_client = StripeClient::new(&configuration.stripe);
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            email_client,
            stripe_client,
            configuration.secret,
            configuration.stripe,
            configuration.application.workers,
        )
        .await?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: Arc<dyn GenericEmailService>,
    stripe_client: StripeClient,
    secret: SecretSetting,
    stripe_setting: StripeSetting,
    workers: usize,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let stripe_client = web::Data::new(stripe_client);
    let secret_obj = web::Data::new(secret);
    let stripe_setting_obj = web::Data::new(stripe_setting);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(stripe_client.clone())
            .app_data(secret_obj.clone())
            .app_data(stripe_setting_obj.clone())
            .configure(main_route)
    })
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}
