use log::error;

use crate::commands::AppContext;
use crate::models::{EventFilters, EventPatch, NewEvent, ResponseStatus, UserRecord};
use crate::session_manager::AuthError;
use crate::utils::OutputFormatter;
use crate::webapp_bridge::PopupSpec;

pub struct EventsHandler;

impl EventsHandler {
    pub async fn handle_list(
        ctx: &AppContext,
        filters: EventFilters,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let events = ctx.api.list_events(&filters).await?;
        if events.is_empty() {
            println!("No events found.");
            return Ok(());
        }
        for event in &events {
            println!("{}", OutputFormatter::format_event_line(event));
        }
        println!("{} event(s)", events.len());
        Ok(())
    }

    pub async fn handle_mine(
        ctx: &AppContext,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = Self::require_user(ctx)?;
        let events = ctx.api.user_events(&user.id).await?;
        if events.is_empty() {
            println!("You have no events yet.");
            return Ok(());
        }
        for event in &events {
            println!("{}", OutputFormatter::format_event_line(event));
        }
        println!("{} event(s)", events.len());
        Ok(())
    }

    pub async fn handle_show(
        ctx: &AppContext,
        event_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event = ctx.api.get_event(event_id).await?;
        println!("{}", OutputFormatter::format_event(&event));
        Ok(())
    }

    pub async fn handle_create(
        ctx: &AppContext,
        event: NewEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = Self::require_user(ctx)?;

        // the host button stays visible while the request is in flight
        let button = ctx.webapp.main_button();
        button.set_label("Create Event");
        button.show();

        let result = ctx.api.create_event(&event, &user.id).await;
        button.hide();

        match result {
            Ok(created) => {
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Success",
                    "Your event has been created!",
                ));
                println!("{}", OutputFormatter::format_event(&created));
                Ok(())
            }
            Err(e) => {
                error!("Event creation failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    "Failed to create event. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    pub async fn handle_edit(
        ctx: &AppContext,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = Self::require_user(ctx)?;
        match ctx.api.update_event(event_id, &patch, &user.id).await {
            Ok(updated) => {
                println!("Event updated.");
                println!("{}", OutputFormatter::format_event(&updated));
                Ok(())
            }
            Err(e) => {
                error!("Event update failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Failed to update event: {}", e),
                ));
                Err(e.into())
            }
        }
    }

    pub async fn handle_responses(
        ctx: &AppContext,
        event_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let responses = ctx.api.event_responses(event_id).await?;
        if responses.is_empty() {
            println!("No responses yet.");
            return Ok(());
        }
        for response in &responses {
            println!("{}", OutputFormatter::format_response(response));
        }
        Ok(())
    }

    /// asks for confirmation through the dialog tiers before posting the
    /// response
    pub async fn handle_respond(
        ctx: &AppContext,
        event_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = Self::require_user(ctx)?;
        let event = ctx.api.get_event(event_id).await?;

        if !ctx.webapp.show_confirm(&format!("Respond to \"{}\"?", event.title)) {
            println!("Cancelled.");
            return Ok(());
        }

        match ctx.api.respond_to_event(event_id, &user.id).await {
            Ok(response) => {
                println!("Response sent ({}).", response.status.name());
                Ok(())
            }
            Err(e) => {
                error!("Response failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Failed to respond: {}", e),
                ));
                Err(e.into())
            }
        }
    }

    /// accepts or rejects a response to one of the caller's events
    pub async fn handle_set_response(
        ctx: &AppContext,
        response_id: &str,
        status: ResponseStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = Self::require_user(ctx)?;
        match ctx.api.update_response(response_id, status, &user.id).await {
            Ok(response) => {
                println!("Response {} is now {}.", response.id, response.status.name());
                Ok(())
            }
            Err(e) => {
                error!("Response update failed: {}", e);
                ctx.webapp.show_popup(&PopupSpec::with_title(
                    "Error",
                    &format!("Failed to update response: {}", e),
                ));
                Err(e.into())
            }
        }
    }

    fn require_user(ctx: &AppContext) -> Result<UserRecord, AuthError> {
        ctx.session.initialize();
        ctx.session.current_user().ok_or(AuthError::NoSession)
    }
}
