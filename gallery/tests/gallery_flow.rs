//! Gallery flows through the store runtime
//!
//! Drives the view controller through a live [`Store`] with a scripted
//! environment so the full submit → response → list-replacement loop is
//! exercised, including the loading-flag bracket.

#![allow(clippy::unwrap_used)]

use chrono::DateTime;
use seal_viewer_api::ImageDescriptor;
use seal_viewer_auth::{AuthState, Header, IdToken, Payload};
use seal_viewer_gallery::{
    GalleryAction, GalleryEnvironment, GalleryReducer, GalleryState, MockGalleryEnvironment,
    NavigationTarget,
};
use seal_viewer_runtime::Store;
use std::sync::Arc;

const EXP: i64 = 1_700_000_000;

fn fresh_session() -> AuthState {
    let token = IdToken::encode(
        Header {
            alg: "RS256".to_string(),
            kid: "key-1".to_string(),
        },
        Payload {
            jti: "token-1".to_string(),
            iss: "https://issuer.example".to_string(),
            sub: "user-1".to_string(),
            aud: "seal-viewer".to_string(),
            exp: EXP,
            iat: EXP - 3600,
            auth_time: EXP - 3600,
            nonce: None,
        },
        "sig".to_string(),
    )
    .unwrap();

    AuthState {
        hydrated: true,
        token: Some(token),
        ..AuthState::default()
    }
}

fn descriptor(name: &str) -> ImageDescriptor {
    ImageDescriptor {
        name: name.to_string(),
        url: format!("https://signed/{name}"),
        size: 100,
        last_modified: None,
    }
}

fn store_with(
    env: MockGalleryEnvironment,
) -> Store<GalleryState, GalleryAction, Arc<dyn GalleryEnvironment>, GalleryReducer> {
    let env: Arc<dyn GalleryEnvironment> = Arc::new(env);
    Store::new(GalleryState::default(), GalleryReducer, env)
}

#[tokio::test]
async fn submit_round_trip_replaces_list_and_brackets_loading() {
    let mut env = MockGalleryEnvironment::with_session(
        fresh_session(),
        DateTime::from_timestamp(EXP - 60, 0).unwrap(),
    );
    env.images_result = Some(Ok(vec![descriptor("a.jpg"), descriptor("b.jpg")]));
    let probe = env.clone();
    let store = store_with(env);

    let mut handle = store
        .send(GalleryAction::SealIdChanged("seal-7".to_string()))
        .await
        .unwrap();
    handle.wait().await;

    let mut handle = store.send(GalleryAction::Submit).await.unwrap();
    handle.wait().await;

    store
        .state(|state| {
            assert_eq!(state.images.len(), 2);
            assert_eq!(state.images[0].name, "a.jpg");
            assert!(state.selected.is_none());
            assert!(state.last_error.is_none());
        })
        .await;

    assert_eq!(probe.fetches(), 1);
    assert_eq!(probe.loading_transitions(), vec![true, false]);
}

#[tokio::test]
async fn failed_search_empties_list_and_resets_loading() {
    let mut env = MockGalleryEnvironment::with_session(
        fresh_session(),
        DateTime::from_timestamp(EXP - 60, 0).unwrap(),
    );
    env.images_result = Some(Err("Network unavailable: connection refused".to_string()));
    let probe = env.clone();
    let store = store_with(env);

    let mut handle = store.send(GalleryAction::Submit).await.unwrap();
    handle.wait().await;

    store
        .state(|state| {
            assert!(state.images.is_empty());
            assert!(state.last_error.is_some());
        })
        .await;

    assert_eq!(probe.loading_transitions(), vec![true, false]);
}

#[tokio::test]
async fn expired_session_redirects_without_any_query() {
    let env = MockGalleryEnvironment::with_session(
        fresh_session(),
        DateTime::from_timestamp(EXP + 60, 0).unwrap(),
    );
    let probe = env.clone();
    let store = store_with(env);

    let mut handle = store.send(GalleryAction::Mounted).await.unwrap();
    handle.wait().await;

    store
        .state(|state| {
            assert_eq!(state.pending_navigation, Some(NavigationTarget::Login));
        })
        .await;

    let mut handle = store.send(GalleryAction::Submit).await.unwrap();
    handle.wait().await;

    assert_eq!(probe.fetches(), 0);
    assert!(probe.loading_transitions().is_empty());
}

#[tokio::test]
async fn navigation_handled_clears_the_decision() {
    let env = MockGalleryEnvironment::with_session(
        AuthState {
            hydrated: true,
            ..AuthState::default()
        },
        DateTime::from_timestamp(EXP, 0).unwrap(),
    );
    let store = store_with(env);

    let mut handle = store.send(GalleryAction::Mounted).await.unwrap();
    handle.wait().await;
    let mut handle = store.send(GalleryAction::NavigationHandled).await.unwrap();
    handle.wait().await;

    store
        .state(|state| assert!(state.pending_navigation.is_none()))
        .await;
}
