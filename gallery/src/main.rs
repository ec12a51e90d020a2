//! Seal viewer demo binary
//!
//! Wires the session store, the loading store, and the gallery view
//! controller together against the real backend, then runs one search
//! and prints the listing.
//!
//! ## Usage
//!
//! ```bash
//! export SEAL_API_BASE_URL="https://api.example.com"
//! export SEAL_USERNAME="alice"
//! export SEAL_PASSWORD="s3cret"
//! seal-viewer <seal-id>
//! ```
//!
//! The session persists to a JSON file between runs, so a second run with
//! a still-fresh token skips the login exchange.

use anyhow::{Context, bail};
use seal_viewer_api::ApiClient;
use seal_viewer_auth::{
    AuthAction, AuthEnvironment, AuthReducer, AuthState, JsonFileStorage, LiveAuthEnvironment,
};
use seal_viewer_core::environment::{Clock, SystemClock};
use seal_viewer_gallery::{
    GalleryAction, GalleryEnvironment, GalleryReducer, GalleryState, LiveGalleryEnvironment,
    LoadingReducer, LoadingState, NavigationTarget,
};
use seal_viewer_runtime::Store;
use std::sync::Arc;

const SESSION_FILE: &str = ".seal-viewer-session.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let seal_id = std::env::args()
        .nth(1)
        .context("Usage: seal-viewer <seal-id>")?;

    let api = ApiClient::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Session store, hydrated from the session file.
    let storage = Arc::new(JsonFileStorage::new(SESSION_FILE));
    let auth_env: Arc<dyn AuthEnvironment> = Arc::new(LiveAuthEnvironment::new(api.clone(), storage));
    let session_store = Store::new(AuthState::default(), AuthReducer, auth_env);

    let mut handle = session_store.send(AuthAction::Hydrate).await?;
    handle.wait().await;

    let authenticated = session_store
        .state(|state| state.is_authenticated(clock.now()))
        .await;
    if !authenticated {
        let username = std::env::var("SEAL_USERNAME").context("SEAL_USERNAME is not set")?;
        let password = std::env::var("SEAL_PASSWORD").context("SEAL_PASSWORD is not set")?;

        let mut handle = session_store
            .send(AuthAction::Login { username, password })
            .await?;
        handle.wait().await;

        let error = session_store.state(|state| state.last_error.clone()).await;
        if let Some(error) = error {
            bail!("Login failed: {error}");
        }
    }

    // Shared loading flag plus the gallery view controller.
    let loading_store = Store::new(LoadingState::default(), LoadingReducer, ());
    let gallery_env: Arc<dyn GalleryEnvironment> = Arc::new(LiveGalleryEnvironment::new(
        api,
        session_store.subscribe(),
        loading_store.clone(),
        clock,
    ));
    let gallery_store = Store::new(GalleryState::default(), GalleryReducer, gallery_env);

    let mut handle = gallery_store.send(GalleryAction::Mounted).await?;
    handle.wait().await;
    let mut handle = gallery_store
        .send(GalleryAction::SealIdChanged(seal_id.clone()))
        .await?;
    handle.wait().await;
    let mut handle = gallery_store.send(GalleryAction::Submit).await?;
    handle.wait().await;

    let snapshot = gallery_store.state(Clone::clone).await;
    if snapshot.pending_navigation == Some(NavigationTarget::Login) {
        bail!("Session is no longer valid; log in again");
    }
    if let Some(error) = snapshot.last_error {
        bail!("Search failed: {error}");
    }

    println!("{} image(s) for {seal_id}:", snapshot.images.len());
    for image in &snapshot.images {
        println!("  {:>10} bytes  {}", image.size, image.name);
    }

    Ok(())
}
