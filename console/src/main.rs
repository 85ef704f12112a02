use crate::error::StackTrace;
use crate::handler::Handler;
use crate::menu::{Menu, Prompt};
use application::Library;
use driver::database::PostgresConnection;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod error;
mod handler;
mod menu;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
                )),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "driver=debug,application=debug,console=debug,sqlx=info",
                )),
        )
        .init();

    let handler = Handler::init()?;
    let library = Library::<PostgresConnection, Handler>::new(handler).await?;

    let mut menu = Menu::new(library, Prompt::stdin());
    menu.run().await?;

    Ok(())
}
