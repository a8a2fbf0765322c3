//! Command handlers for the tickets CLI.
//!
//! Each handler makes one API call and prints its result as JSON.

use ticketsapp::api::TicketsApi;
use ticketsapp::commands::filter::{GenericFilterRequest, UserFilterRequest};
use ticketsapp::commands::search::TicketFilter;
use ticketsapp::commands::tickets::TicketPatch;
use ticketsapp::commands::users::UserPatch;
use ticketsapp::model::{Ticket, User};
use ticketsapp::store::fs_backend::FsBackend;

use super::render::print_json;
use super::setup::{
    Commands, FilterArgs, SearchArgs, TicketChanges, UserChanges, UserCommands,
};

type Api = TicketsApi<FsBackend>;

pub async fn dispatch(api: &mut Api, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Create {
            title,
            name,
            email,
            priority,
            user,
        } => {
            let mut ticket = Ticket::new(title, name, email);
            if let Some(priority) = priority {
                ticket.priority = priority;
            }
            ticket.user_id = user;
            ticket.is_assigned = user.is_some();
            print_json(&api.create_ticket(ticket).await?)
        }
        Commands::List { assignee } => match assignee {
            Some(user_id) => print_json(&api.tickets_assigned_to(user_id).await?),
            None => print_json(&api.list_tickets().await?),
        },
        Commands::Show { id } => print_json(&api.ticket_detail(id).await?),
        Commands::Update { id, changes } => {
            print_json(&api.update_ticket(id, ticket_patch(changes)).await?)
        }
        Commands::Remove { id } => print_json(&api.remove_ticket(id).await?),
        Commands::Search(args) => print_json(&api.search_tickets(&ticket_filter(args)).await?),
        Commands::Filter(args) => print_json(&api.filter_tickets(&filter_request(args)).await?),
        Commands::Message {
            ticket_id,
            author,
            attachments,
            content,
        } => {
            let view = api
                .post_message(ticket_id, author, content.join(" "), attachments)
                .await?;
            print_json(&view)
        }
        Commands::Messages { ticket_id } => print_json(&api.ticket_messages(ticket_id).await?),
        Commands::Edit {
            id,
            attachments,
            content,
        } => print_json(&api.update_message(id, content.join(" "), attachments).await?),
        Commands::Unpost { id } => print_json(&api.remove_message(id).await?),
        Commands::Read { ticket_id } => print_json(&api.mark_messages_read(ticket_id).await?),
        Commands::User { action } => user(api, action).await,
    }
}

async fn user(api: &mut Api, action: UserCommands) -> anyhow::Result<()> {
    match action {
        UserCommands::Add {
            user_name,
            full_name,
            email,
            language,
        } => {
            let mut user = User::new(user_name, full_name, email);
            if let Some(language) = language {
                user.language = language;
            }
            print_json(&api.create_user(user).await?)
        }
        UserCommands::List => print_json(&api.list_users().await?),
        UserCommands::Show { id } => print_json(&api.get_user(id).await?),
        UserCommands::Filter { filter, deleted } => {
            let request = UserFilterRequest {
                filter: filter_request(filter),
                deleted,
            };
            print_json(&api.filter_users(&request).await?)
        }
        UserCommands::Update { id, changes } => {
            print_json(&api.update_user(id, user_patch(changes)).await?)
        }
        UserCommands::Language { id, language } => {
            print_json(&api.change_user_language(id, language).await?)
        }
        UserCommands::Deactivate { id } => print_json(&api.deactivate_user(id).await?),
        UserCommands::Remove { id } => print_json(&api.remove_user(id).await?),
    }
}

fn ticket_patch(changes: TicketChanges) -> TicketPatch {
    let user_id = match (changes.assign, changes.unassign) {
        (Some(id), _) => Some(Some(id)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    TicketPatch {
        title: changes.title,
        name: changes.name,
        email: changes.email,
        priority: changes.priority,
        status: changes.status,
        user_id,
    }
}

fn user_patch(changes: UserChanges) -> UserPatch {
    let phone_number = match (changes.phone, changes.clear_phone) {
        (Some(phone), _) => Some(Some(phone)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    UserPatch {
        user_name: changes.user_name,
        full_name: changes.full_name,
        email: changes.email,
        phone_number,
    }
}

fn ticket_filter(args: SearchArgs) -> TicketFilter {
    TicketFilter {
        status: args.status,
        priority: args.priority,
        user_id: args.user,
        start: args.from,
        end: args.to,
        search_text: args.text.filter(|text| !text.is_empty()),
    }
}

fn filter_request(args: FilterArgs) -> GenericFilterRequest {
    match args.field {
        Some(field) => GenericFilterRequest::by_field(field, args.op, args.value.unwrap_or_default()),
        None => args
            .text
            .map(GenericFilterRequest::by_text)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketsapp::fields::FilterOp;

    #[test]
    fn test_unassign_clears_user() {
        let patch = ticket_patch(TicketChanges {
            unassign: true,
            ..Default::default()
        });
        assert_eq!(patch.user_id, Some(None));
        assert_eq!(ticket_patch(TicketChanges::default()).user_id, None);
    }

    #[test]
    fn test_clear_phone_clears_number() {
        let patch = user_patch(UserChanges {
            clear_phone: true,
            ..Default::default()
        });
        assert_eq!(patch.phone_number, Some(None));
        assert_eq!(user_patch(UserChanges::default()), UserPatch::default());
    }

    #[test]
    fn test_filter_request_prefers_field() {
        let request = filter_request(FilterArgs {
            field: Some("email".into()),
            value: Some("corp".into()),
            op: FilterOp::Contains,
            text: Some("ignored".into()),
        });
        assert_eq!(request.property_name.as_deref(), Some("email"));
        assert_eq!(request.value, Some(serde_json::json!("corp")));
        assert_eq!(request.search_string, None);
    }

    #[test]
    fn test_empty_filter_args_match_everything() {
        assert_eq!(
            filter_request(FilterArgs::default()),
            GenericFilterRequest::default()
        );
    }

    #[test]
    fn test_empty_search_text_is_no_criterion() {
        let filter = ticket_filter(SearchArgs {
            text: Some(String::new()),
            ..Default::default()
        });
        assert!(filter.is_unfiltered());
    }
}
