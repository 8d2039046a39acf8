use std::path::Path;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings and logging, then hands over to the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_settings(Path::new("config.toml"))?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
