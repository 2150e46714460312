use biolink_payments::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber)
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub async fn spawn_app() -> String {
    Lazy::force(&TRACING);
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.application.port = 0;
    let application = Application::build(configuration)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());
    address
}

#[actix_web::test]
async fn webhook_without_signature_is_rejected() {
    let address = spawn_app().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/webhook/stripe", &address))
        .header("Content-Type", "application/json")
        .body(r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{}}}"#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn webhook_with_invalid_signature_is_rejected() {
    let address = spawn_app().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/webhook/stripe", &address))
        .header("Content-Type", "application/json")
        .header("Stripe-Signature", "t=1,v1=deadbeef")
        .body(r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{}}}"#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
}
