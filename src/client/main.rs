/**
 * TrashDrop Diagnostics Entry Point
 *
 * Command-line companion for troubleshooting the client auth state kept in
 * the file-backed local storage.
 *
 * Commands:
 * - `token` (default) - decode the stored token and call the profile endpoint
 * - `sign-in <email> <password> [--remember]` - sign in and store the artifacts
 * - `refresh` - exchange the stored refresh token and store the new session
 * - `logout [--emergency]` - run the logout flow against the stored artifacts
 * - `compat <url> [user-agent]` - show the compatibility decision for a page
 */

use std::sync::Arc;
use trashdrop::client::{
    compat, AuthManager, Config, HeadlessPage, LogoutButton, LogoutController, LogoutOutcome,
    PageEnvironment, RenderFilter, TokenDiagnostics,
};
use trashdrop::shared::storage::{
    load_session_artifacts, store_session_artifacts, FileStorage, KeyValueStore, MemoryStorage,
};
use trashdrop::shared::Credentials;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) trashdrop-diag";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("token");

    let config = Config::from_env()?;
    let storage_path = config
        .storage_path()
        .ok_or("Could not determine a local storage path; set LOCAL_STORAGE_PATH")?;
    let storage = Arc::new(FileStorage::open(&storage_path));
    tracing::debug!("Using local storage at {}", storage.path().display());

    match command {
        "token" => {
            let report = TokenDiagnostics::new(storage, config.server_url()).run().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "sign-in" => {
            let (Some(email), Some(password)) = (args.get(1), args.get(2)) else {
                return Err("usage: trashdrop-diag sign-in <email> <password> [--remember]".into());
            };
            let remember = args.iter().any(|a| a == "--remember");
            let handle = config.capability_handle();
            let capability = handle
                .get()
                .ok_or("auth capability missing after installation")?;
            let data = capability
                .sign_in_with_password(&Credentials::new(email.as_str(), password.as_str()))
                .await?;
            store_session_artifacts(storage.as_ref(), &data.session, remember)?;
            println!("Signed in as {} ({})", data.user.email, capability.name());
        }
        "refresh" => {
            let client = config
                .remote_client(load_session_artifacts(storage.as_ref()))
                .ok_or("refresh needs the hosted auth service; set AUTH_URL")?;
            let session = client.refresh_session().await?;
            store_session_artifacts(storage.as_ref(), &session, false)?;
            println!(
                "Session refreshed for {}; expires {}",
                session.user.email,
                session
                    .expires_at
                    .map(|expiry| expiry.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
            );
        }
        "logout" => {
            let page = Arc::new(HeadlessPage::new());
            let controller = LogoutController::new(
                AuthManager::new(config.capability_handle_for(storage.as_ref())),
                storage.clone(),
                Arc::new(MemoryStorage::new()),
                page.clone(),
            );
            if args.iter().any(|a| a == "--emergency") {
                controller.emergency_logout()?;
            } else {
                controller.bind([LogoutButton::new("logout", "Log out")]);
                if let LogoutOutcome::Failed(e) = controller.click("logout").await {
                    return Err(e.into());
                }
            }
            println!(
                "Logged out; redirected to {}; {} key(s) left in local storage",
                page.last_navigation().unwrap_or_default(),
                storage.keys().len()
            );
        }
        "compat" => {
            let Some(url) = args.get(1) else {
                return Err("usage: trashdrop-diag compat <url> [user-agent]".into());
            };
            let agent = args.get(2).map(String::as_str).unwrap_or(DEFAULT_USER_AGENT);
            let env = PageEnvironment::from_url(agent, url)?;
            let decision = compat::evaluate(&env);
            match &decision.redirect {
                Some(redirect) => println!("redirect ({}): {}", redirect.rule, redirect.url),
                None => println!("no redirect"),
            }
            for substitution in &decision.substitutions {
                println!("substitute: {:?}", substitution);
            }
            if RenderFilter::for_environment(&env).is_hidden("install-app-banner") {
                println!("hidden: install-app-banner");
            }
        }
        other => {
            return Err(format!("unknown command '{}'", other).into());
        }
    }

    Ok(())
}
