use serde_json::Value;
use tempfile::TempDir;
use ticketsapp::api::TicketsApi;
use ticketsapp::commands::tickets::TicketPatch;
use ticketsapp::model::{Status, Ticket, User};
use ticketsapp::store::fs_backend::FsBackend;

fn read_table(dir: &TempDir, table: &str) -> Value {
    let content = std::fs::read_to_string(dir.path().join(format!("{}.json", table))).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_tables_are_written_as_json_arrays() {
    let dir = TempDir::new().unwrap();
    let mut api = TicketsApi::open(dir.path()).unwrap();
    api.create_ticket(Ticket::new("VPN", "Ann", "ann@example.com"))
        .await
        .unwrap();
    api.create_user(User::new("ann", "Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    let tickets = read_table(&dir, "tickets");
    assert_eq!(tickets[0]["id"], 1);
    assert_eq!(tickets[0]["status"], "PENDING");
    assert_eq!(tickets[0]["priority"], "NOT_SURE");
    assert!(tickets[0].get("messages").is_none());

    let users = read_table(&dir, "users");
    assert_eq!(users[0]["language"], "ENGLISH");
}

#[tokio::test]
async fn test_reopen_sees_committed_state() {
    let dir = TempDir::new().unwrap();
    {
        let mut api = TicketsApi::new(FsBackend::new(dir.path())).unwrap();
        api.create_ticket(Ticket::new("VPN", "Ann", "ann@example.com"))
            .await
            .unwrap();
        api.update_ticket(
            1,
            TicketPatch {
                status: Some(Status::Finished),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        api.post_message(1, "support", "fixed", vec!["patch.diff".into()])
            .await
            .unwrap();
    }

    let mut api = TicketsApi::open(dir.path()).unwrap();
    let ticket = api.get_ticket(1).await.unwrap();
    assert_eq!(ticket.status, Status::Finished);
    assert!(ticket.has_new_messages);

    let removed = api.remove_ticket(1).await.unwrap();
    assert!(removed.is_success());
    assert_eq!(read_table(&dir, "messages"), Value::Array(vec![]));
    assert_eq!(read_table(&dir, "attachments"), Value::Array(vec![]));
}

#[tokio::test]
async fn test_no_tmp_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let mut api = TicketsApi::open(dir.path()).unwrap();
    for i in 0..3 {
        api.create_ticket(Ticket::new(format!("t{}", i), "Ann", "ann@example.com"))
            .await
            .unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["tickets.json".to_string()]);
}
