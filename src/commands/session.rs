use log::{error, info};

use crate::commands::AppContext;
use crate::utils::OutputFormatter;
use crate::webapp_bridge::PopupSpec;

pub struct SessionHandler;

impl SessionHandler {
    /// restores the cached session or signs in against the backend
    pub async fn handle_login(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let state = ctx.session.initialize();
        ctx.webapp.signal_ready();

        if let Some(user) = state.user() {
            info!("Session restored from cache");
            println!("Already signed in.");
            println!("{}", OutputFormatter::format_user(user));
            return Ok(());
        }

        match ctx.session.login().await {
            Ok(user) => {
                println!("Signed in.");
                println!("{}", OutputFormatter::format_user(&user));
                Ok(())
            }
            Err(e) => {
                error!("Login failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Authentication failed: {}", e),
                ));
                Err(e.into())
            }
        }
    }

    pub async fn handle_logout(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        ctx.session.initialize();
        ctx.session.logout();
        println!("Signed out.");
        Ok(())
    }

    pub async fn handle_whoami(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let state = ctx.session.initialize();
        match state.user() {
            Some(user) => println!("Signed in as {} ({})", user.name, user.id),
            None => println!("No active session ({})", state.name()),
        }
        Ok(())
    }

    /// drops the cached identity and signs in from scratch
    pub async fn handle_reauth(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        ctx.session.initialize();
        match ctx.session.force_reauth().await {
            Ok(user) => {
                println!("Re-authenticated.");
                println!("{}", OutputFormatter::format_user(&user));
                Ok(())
            }
            Err(e) => {
                error!("Re-authentication failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Authentication failed: {}", e),
                ));
                Err(e.into())
            }
        }
    }
}
