//! Session commands.

use std::sync::Arc;

use fastrac_storefront::auth::AuthStore;
use fastrac_storefront::catalog::types::LoginCredentials;

use super::{CommandError, Context};

fn open_store(ctx: &Context) -> AuthStore {
    AuthStore::open(ctx.client.clone(), Arc::clone(&ctx.storage))
}

/// Log in and cache the session.
pub async fn login(ctx: &Context, username: String, password: String) -> Result<(), CommandError> {
    let mut store = open_store(ctx);
    let credentials = LoginCredentials { username, password };

    let user = store.login(&credentials).await?;
    println!("Logged in as {} ({})", user.full_name(), user.username);

    Ok(())
}

/// Print the logged-in user, refreshing the profile when reachable.
pub async fn whoami(ctx: &Context) {
    let mut store = open_store(ctx);

    if !store.is_authenticated() {
        println!("Not logged in.");
        return;
    }

    // Prefer a fresh profile; fall back to the cached one offline
    match store.refresh().await {
        Ok(user) => {
            println!("{} ({})", user.full_name(), user.username);
            println!("{}", user.email);
        }
        Err(e) => {
            tracing::warn!("profile refresh failed: {e}");
            match store.user() {
                Some(user) => {
                    println!("{} ({})  [cached]", user.full_name(), user.username);
                    println!("{}", user.email);
                }
                None => println!("Session expired. Please log in again."),
            }
        }
    }
}

/// Clear the cached session.
pub fn logout(ctx: &Context) {
    let mut store = open_store(ctx);

    if !store.is_authenticated() {
        println!("Not logged in.");
        return;
    }

    store.logout();
    println!("Logged out.");
}
