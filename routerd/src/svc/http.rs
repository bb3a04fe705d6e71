use std::future::IntoFuture;
use std::io;
use std::time::Duration;

use rst_common::with_http_tokio::axum::Router;
use rst_common::with_http_tokio::tower_http::timeout::TimeoutLayer;
use rst_common::with_http_tokio::tower_http::trace::TraceLayer;
use rst_common::with_logging::log::{error, info};
use rst_common::with_tokio::tokio;
use rst_common::with_tokio::tokio::net::TcpListener;
use rst_common::with_tokio::tokio::task::{JoinError, JoinHandle};
use rst_common::with_tracing::tracing_subscriber::{
    self, layer::SubscriberExt, util::SubscriberInitExt,
};

use hubrouter_api::operation::Dispatchers;
use hubrouter_api::HubRouter;

use crate::errors::RouterdError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Http {
    config: String,
}

impl Http {
    pub fn new(config: String) -> Http {
        Self { config }
    }

    fn init_tracing(&self) {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    format!(
                        "{}=debug,tower_http=debug,axum=trace",
                        env!("CARGO_CRATE_NAME")
                    )
                    .into()
                }),
            )
            .with(tracing_subscriber::fmt::layer().without_time())
            .try_init();
    }

    /// `svc` builds the router together with its dispatcher loops, the loops are not
    /// running until [`Dispatchers::spawn`] is called
    pub fn svc(&self) -> Result<(String, Router, Dispatchers), RouterdError> {
        self.init_tracing();

        let hub_router =
            HubRouter::new(&self.config).map_err(|err| RouterdError::ConfigError(err.to_string()))?;

        let config_app = hub_router
            .build_app_config()
            .map_err(|err| RouterdError::ConfigError(err.to_string()))?;

        let (operation, dispatchers) = hub_router
            .build_operation()
            .map_err(|err| RouterdError::ServerError(err.to_string()))?;

        let app = operation.routes().layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(REQUEST_TIMEOUT),
        ));

        Ok((config_app.get_listen_addr(), app, dispatchers))
    }

    pub async fn serve(&self) -> Result<(), RouterdError> {
        let (addr, app, dispatchers) = self.svc()?;

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|err| RouterdError::ServerError(err.to_string()))?;

        let handles = dispatchers.spawn();

        info!("routerd listening on {}", addr);
        supervise(rst_common::with_http_tokio::axum::serve(listener, app), handles).await
    }
}

/// `supervise` runs the server until it stops or one of the dispatcher loops exits
///
/// Both loops only end when their channel closes or their task panics, the router cannot
/// answer anymore in both cases so the server is stopped with an error
pub async fn supervise<TServer>(
    server: TServer,
    dispatchers: (JoinHandle<()>, JoinHandle<()>),
) -> Result<(), RouterdError>
where
    TServer: IntoFuture<Output = io::Result<()>>,
{
    let (action, message) = dispatchers;

    tokio::select! {
        served = server.into_future() => served.map_err(|err| RouterdError::ServerError(err.to_string())),
        exited = action => Err(dispatcher_exited("action", exited)),
        exited = message => Err(dispatcher_exited("message", exited)),
    }
}

fn dispatcher_exited(name: &str, exited: Result<(), JoinError>) -> RouterdError {
    let reason = match exited {
        Ok(_) => "channel closed".to_string(),
        Err(err) => err.to_string(),
    };

    error!("{} dispatcher exited: {}", name, reason);
    RouterdError::ServerError(format!("{} dispatcher exited: {}", name, reason))
}
