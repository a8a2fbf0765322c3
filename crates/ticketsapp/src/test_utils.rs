use crate::api::TicketsApi;
use crate::model::{Priority, Status, Ticket, User};
use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn backend(&self) -> FsBackend {
        FsBackend::new(self.root.clone())
    }

    /// A fresh API over this environment's files.
    pub fn api(&self) -> TicketsApi<FsBackend> {
        TicketsApi::new(self.backend()).expect("projections must validate")
    }
}

/// Two assigned tickets: #1 OPENED/HIGH for user 5, #2 PENDING/LOW for user 7.
pub fn scenario_tickets() -> Vec<Ticket> {
    let mut first = Ticket::new("VPN drops every hour", "Ann Lee", "ann@example.com");
    first.status = Status::Opened;
    first.priority = Priority::High;
    first.user_id = Some(5);
    first.is_assigned = true;

    let mut second = Ticket::new("Printer out of toner", "Bob Stone", "bob@example.com");
    second.status = Status::Pending;
    second.priority = Priority::Low;
    second.user_id = Some(7);
    second.is_assigned = true;

    vec![first, second]
}

pub fn sample_users() -> Vec<User> {
    vec![
        User::new("ann", "Ann Lee", "ann@example.com"),
        User::new("bob", "Bob Stone", "bob@example.com"),
    ]
}
