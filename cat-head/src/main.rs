//! CAT head-unit daemon
//!
//! Brings up the CI-V engine on the configured serial port and stands in
//! for the rest of the device: it owns the shared radio state the real UI
//! would render from, drains the UI refresh notifications, and reports
//! link health transitions.

mod config;

use civ_engine::{BandPlan, CatLink, LinkHealth, RadioState, SharedRadio, UiNotifier};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cat_head=info,civ_engine=info,civ_wire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CAT head unit");

    let path = std::env::args().nth(1);
    let config = config::load_or_default(path.as_deref());

    let state = RadioState::new(
        BandPlan::new(config.bands.clone()),
        config.initial_frequency_hz,
        config.initial_mode,
    );
    let radio = SharedRadio::new(state);

    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let link = CatLink::spawn(config.link.clone(), radio.clone(), UiNotifier::new(ui_tx));

    // Surface link health transitions; a degraded link means CAT is
    // silent while the rest of the device keeps running
    let mut health = link.health();
    tokio::spawn(async move {
        while health.changed().await.is_ok() {
            match &*health.borrow() {
                LinkHealth::Online => info!("CAT link online"),
                LinkHealth::Degraded { reason } => warn!("CAT link degraded: {}", reason),
            }
        }
    });

    // Stand-in for the display: the real UI redraws from the shared state
    // when one of these arrives
    tokio::spawn(async move {
        while let Some(event) = ui_rx.recv().await {
            debug!(?event, "state changed");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}
