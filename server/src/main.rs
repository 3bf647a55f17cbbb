use anyhow::Context;
use emoji_guess_server::{config::Config, game::WordList, telemetry};
use tokio::{
    net::TcpListener,
    signal::unix::{signal, SignalKind},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let words = WordList::countries().context("could not load the word list")?;

    let mut interrupt =
        signal(SignalKind::interrupt()).context("failed to create interrupt signal stream")?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("could not bind to port {}", config.port))?;

    info!(
        port = config.port,
        allowed_origin = %config.allowed_origin,
        words = words.len(),
        "listening"
    );

    emoji_guess_server::serve(listener, config, words, async move {
        interrupt.recv().await;
    })
    .await
}
