//! # dsrserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour héberger le récepteur de callbacks
//! SOAP : construction du serveur depuis la configuration, montage de routers,
//! démarrage, arrêt gracieux et initialisation des logs.
//!
//! ## Architecture
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Initialisation de `tracing-subscriber`
//!
//! Les crates métier étendent [`Server`] via des traits d'extension, sans que
//! `dsrserver` ne les connaisse (voir `dsrsoap::CallbackReceiverExt`).
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use dsrserver::{ServerBuilder, logs::{LoggingOptions, init_logging}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_logging(LoggingOptions::default());
//!
//!     let mut server = ServerBuilder::new_configured().build();
//!     server
//!         .add_router("/", Router::new().route("/ping", get(|| async { "pong" })))
//!         .await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LoggingOptions, init_logging};
pub use server::{Server, ServerBuilder, ServerInfo};
