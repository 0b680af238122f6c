use crate::models::{Event, EventResponse, UserRecord};

pub struct OutputFormatter;

impl OutputFormatter {
    /// multi-line profile card
    pub fn format_user(user: &UserRecord) -> String {
        let mut lines = vec![
            format!("User {} (telegram {})", user.id, user.telegram_id),
            format!("  Name:      {}", user.name),
        ];
        if let Some(bio) = &user.bio {
            lines.push(format!("  Bio:       {}", bio));
        }
        if let Some(avatar_url) = &user.avatar_url {
            lines.push(format!("  Avatar:    {}", avatar_url));
        }
        if !user.interests.is_empty() {
            lines.push(format!("  Interests: {}", user.interests.join(", ")));
        }
        if !user.photos.is_empty() {
            lines.push(format!("  Photos:    {}", user.photos.len()));
        }
        lines.join("\n")
    }

    /// one-line summary for event listings
    pub fn format_event_line(event: &Event) -> String {
        let access = if event.is_open { "open" } else { "closed" };
        format!(
            "[{}] {} | {} | {} | {} ({})",
            event.id,
            event.title,
            event.event_type.name(),
            event.location,
            event.datetime,
            access
        )
    }

    /// multi-line event card
    pub fn format_event(event: &Event) -> String {
        let mut lines = vec![
            format!("Event {} ({})", event.id, event.event_type.name()),
            format!("  Title:    {}", event.title),
            format!("  Where:    {}", event.location),
            format!("  When:     {}", event.datetime),
            format!(
                "  Access:   {}",
                if event.is_open { "open" } else { "closed" }
            ),
        ];
        if !event.description.is_empty() {
            lines.push(format!("  About:    {}", event.description));
        }
        match &event.creator {
            Some(creator) => {
                lines.push(format!("  Creator:  {} ({})", creator.name, event.creator_id))
            }
            None => lines.push(format!("  Creator:  {}", event.creator_id)),
        }
        if let Some(responses) = &event.responses {
            lines.push(format!("  Responses: {}", responses.len()));
        }
        lines.join("\n")
    }

    pub fn format_response(response: &EventResponse) -> String {
        let who = match &response.user {
            Some(user) => format!("{} ({})", user.name, response.user_id),
            None => response.user_id.clone(),
        };
        format!(
            "[{}] {} is {} (at {})",
            response.id,
            who,
            response.status.name(),
            response.responded_at
        )
    }
}
