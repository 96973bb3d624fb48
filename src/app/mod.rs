pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    config::{AppConfig, WEBHOOK_URL_ENV},
    webhook_client::{WebhookClient, WebhookRelay},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let webhook_config = &config.webhook_config;

        let relay: Option<Arc<dyn WebhookRelay>> = match webhook_config.url() {
            Some(url) => {
                let client = WebhookClient::new(url, webhook_config.timeout())?;
                info!("{:<20} - {}", "Relaying to:", client.host());
                Some(Arc::new(client))
            }
            None => {
                error!(
                    "{:<20} - {WEBHOOK_URL_ENV} is not set, every signup will be rejected",
                    "Missing webhook:"
                );
                None
            }
        };

        let app_state = AppState::new(relay);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    relay: Option<Arc<dyn WebhookRelay>>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    /// `None` means no webhook is configured, the app still serves but can't relay anything.
    pub fn new(relay: Option<Arc<dyn WebhookRelay>>) -> Self {
        AppState(Arc::new(InternalState { relay }))
    }
}

impl InternalState {
    pub fn relay(&self) -> Option<&dyn WebhookRelay> {
        self.relay.as_deref()
    }
}
