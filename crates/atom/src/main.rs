use anyhow::Result;
use atom::{App, Config};
use log::LevelFilter;
use tokio::io::{self, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; keep them quiet unless RUST_LOG asks for more
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Warn);
    }
    logger.init();

    let mut app = App::new(Config::default());
    log::info!("Application initialized successfully");

    let stdin = BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    if let Err(err) = app.run(stdin, &mut stdout).await {
        eprintln!("アプリケーション実行中にエラーが発生しました: {}", err);
        if let Some(source) = err.source() {
            eprintln!("原因: {}", source);
        }
        log::error!("Application error: {}", err);
        return Err(err);
    }

    Ok(())
}
