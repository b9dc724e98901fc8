use anyhow::Context;

use event_registration::{app, telemetry, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("load configuration")?;
    telemetry::init(&config.logging);

    let app_state = AppState::init(config.clone()).context("prepare storage")?;
    let app = app::build_app(app_state);
    app::serve(&config, app).await
}
