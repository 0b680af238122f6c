use log::error;

use crate::commands::AppContext;
use crate::utils::OutputFormatter;

pub struct DoctorHandler;

impl DoctorHandler {
    /// prints the resolved environment, bridge and session state, and probes
    /// the backend
    pub async fn handle_doctor(
        ctx: &AppContext,
        force_reauth: bool,
        clear_cache: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("Environment:     {}", ctx.config.environment.name());
        println!("API base:        {}", ctx.api.base());
        println!("Guest policy:    {}", ctx.config.guest_policy.name());
        println!("Profile path:    {}", ctx.config.profile_path.display());
        println!("Bridge attached: {}", ctx.webapp.is_available());
        println!("Init data:       {} chars", ctx.webapp.init_data().len());

        let state = ctx.session.initialize();
        println!("Session:         {}", state.name());
        if let Some(user) = state.user() {
            println!("User:            {} ({})", user.name, user.id);
        }

        match ctx.api.health().await {
            Ok(code) => println!("Backend:         reachable (HTTP {})", code),
            Err(e) => println!("Backend:         unreachable ({})", e),
        }

        if clear_cache {
            ctx.session.logout();
            println!("Cache cleared.");
        }

        if force_reauth {
            match ctx.session.force_reauth().await {
                Ok(user) => {
                    println!("Re-authenticated.");
                    println!("{}", OutputFormatter::format_user(&user));
                }
                Err(e) => {
                    error!("Forced re-authentication failed: {}", e);
                    println!("Re-authentication failed: {}", e);
                }
            }
        }

        Ok(())
    }
}
