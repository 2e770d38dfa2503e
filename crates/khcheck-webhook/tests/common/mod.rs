use axum::Router;
use khcheck_webhook::{
    api::admission_review::GroupVersionResource, config::Config,
    validation::DEFAULT_MAX_BODY_SIZE, WebhookServer,
};
use std::net::SocketAddr;

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 8443)),
        tls_config: None,
        expected_resource: GroupVersionResource::new("comcast.github.io", "v1", "khchecks"),
        max_body_size: DEFAULT_MAX_BODY_SIZE,
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = WebhookServer::new_from_config(config).await.unwrap();

    server.router()
}
