use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use open_now::{config::Config, logger::init_logger, server::server::Server, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_logger(config.log_json);

    let server = Server::setup(&config)?;
    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(
        address = %config.bind_address,
        default_time_zone = %config.default_time_zone,
        "Listening"
    );

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::error!(error = %err, "Could not accept connection");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                tracing::error!(%peer, error = %err, "Connection failed");
            }
        });
    }
}
