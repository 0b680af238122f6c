use log::error;

use crate::commands::AppContext;
use crate::models::UserPatch;
use crate::utils::OutputFormatter;
use crate::webapp_bridge::PopupSpec;

pub struct ProfileHandler;

impl ProfileHandler {
    pub async fn handle_show(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let state = ctx.session.initialize();
        match state.user() {
            Some(user) => println!("{}", OutputFormatter::format_user(user)),
            None => println!("No active session."),
        }
        Ok(())
    }

    /// sends the given fields to the backend; the offline guest is edited
    /// locally instead
    pub async fn handle_set(
        ctx: &AppContext,
        patch: UserPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if patch.is_empty() {
            println!("Nothing to update.");
            return Ok(());
        }

        ctx.session.initialize();
        match ctx.session.update_user(&patch).await {
            Ok(user) => {
                println!("Profile updated.");
                println!("{}", OutputFormatter::format_user(&user));
                Ok(())
            }
            Err(e) => {
                error!("Profile update failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Failed to update profile: {}", e),
                ));
                Err(e.into())
            }
        }
    }
}
