// SPDX-License-Identifier: MIT OR Apache-2.0
//! `NodeWire` - visual node-graph editor.
//!
//! A small editor shell around the `nodewire_graph` crate:
//! - Pannable workspace with typed, capacity-checked connections
//! - Right-click catalog menu for placing nodes
//! - Orphan reporting in the status bar

mod app;

use app::NodeWireApp;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("nodewire_graph=debug".parse().expect("valid directive"))
        .add_directive("nodewire_app=debug".parse().expect("valid directive"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NodeWire v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = NodeWireApp::run() {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
