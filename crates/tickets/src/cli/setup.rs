use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use ticketsapp::fields::FilterOp;
use ticketsapp::model::{Language, Priority, Status};

#[derive(Parser, Debug)]
#[command(
    name = "tickets",
    bin_name = "tickets",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Support tickets from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the table files (overrides config)
    #[arg(long, global = true, help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file to read
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a new ticket
    #[command(alias = "n", display_order = 1)]
    Create {
        /// Ticket title
        title: String,

        /// Name of the person raising the ticket
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        #[arg(long)]
        priority: Option<Priority>,

        /// Assign to this user id
        #[arg(long)]
        user: Option<i64>,
    },

    /// List tickets
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only tickets assigned to this user id
        #[arg(long)]
        assignee: Option<i64>,
    },

    /// Show a ticket with its messages
    #[command(alias = "v", display_order = 3)]
    Show { id: i64 },

    /// Change ticket fields
    #[command(display_order = 4)]
    Update {
        id: i64,

        #[command(flatten)]
        changes: TicketChanges,
    },

    /// Remove a ticket, its messages and their attachments
    #[command(alias = "rm", display_order = 5)]
    Remove { id: i64 },

    /// Search tickets by several criteria at once
    #[command(display_order = 6)]
    Search(SearchArgs),

    /// Filter tickets on one field, or by free text
    #[command(display_order = 7)]
    Filter(FilterArgs),

    /// Post a message on a ticket
    #[command(display_order = 10)]
    Message {
        ticket_id: i64,

        #[arg(long)]
        author: String,

        /// Attachment path (repeatable)
        #[arg(long = "attach")]
        attachments: Vec<String>,

        /// Message words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// List the messages of a ticket
    #[command(display_order = 11)]
    Messages { ticket_id: i64 },

    /// Rewrite a message; any --attach replaces its attachments
    #[command(display_order = 12)]
    Edit {
        id: i64,

        /// Attachment path (repeatable)
        #[arg(long = "attach")]
        attachments: Vec<String>,

        /// New message words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// Remove a message and its attachments
    #[command(display_order = 13)]
    Unpost { id: i64 },

    /// Mark a ticket's messages as read
    #[command(display_order = 14)]
    Read { ticket_id: i64 },

    /// Manage support users
    #[command(display_order = 20)]
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Args, Debug, Default)]
pub struct TicketChanges {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub status: Option<Status>,

    /// Assign to this user id
    #[arg(long, conflicts_with = "unassign")]
    pub assign: Option<i64>,

    /// Clear the assignee
    #[arg(long)]
    pub unassign: bool,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub status: Option<Status>,

    #[arg(long)]
    pub priority: Option<Priority>,

    /// Assigned user id
    #[arg(long)]
    pub user: Option<i64>,

    /// Opened at or after (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Opened at or before (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    /// Free text over the searchable fields
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Field to filter on
    #[arg(long, requires = "value")]
    pub field: Option<String>,

    /// Value to compare with
    #[arg(long)]
    pub value: Option<String>,

    /// `equals` or `contains`
    #[arg(long, default_value_t = FilterOp::Contains)]
    pub op: FilterOp,

    /// Free text, used when no field is given
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UserChanges {
    #[arg(long)]
    pub user_name: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, conflicts_with = "clear_phone")]
    pub phone: Option<String>,

    /// Remove the phone number
    #[arg(long)]
    pub clear_phone: bool,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Add {
        user_name: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        language: Option<Language>,
    },

    /// List live users
    #[command(alias = "ls")]
    List,

    /// Show one user
    Show { id: i64 },

    /// Filter users on one field, or by free text
    Filter {
        #[command(flatten)]
        filter: FilterArgs,

        /// Look among deactivated users instead
        #[arg(long)]
        deleted: bool,
    },

    /// Change a user's names, email or phone
    Update {
        id: i64,

        #[command(flatten)]
        changes: UserChanges,
    },

    /// Change a user's language
    Language { id: i64, language: Language },

    /// Deactivate a user, keeping the record
    Deactivate { id: i64 },

    /// Remove a user for good
    #[command(alias = "rm")]
    Remove { id: i64 },
}
