use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use notesync::server::{self, AppState};
use notesync::{
    HttpNoteStore, InMemoryNoteStore, KeywordTagSuggester, NewNote, NoteQuery, NoteStore,
    NoteSyncError, NoteSession, NoteUpdate, OwnerId, PageRequest, SessionIdentity, SessionMode,
    TagSuggester,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<notesync::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState {
            store: Arc::new(InMemoryNoteStore::with_samples(&OwnerId::new("1"))),
            suggester: Arc::new(KeywordTagSuggester::with_seed(11)),
            default_limit: 9,
        };
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server::serve(listener, state, shutdown.clone()));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn client(&self) -> HttpNoteStore {
        HttpNoteStore::new(&format!("http://{}", self.addr), Duration::from_secs(5)).unwrap()
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap().unwrap();
    }
}

fn demo() -> OwnerId {
    OwnerId::new("1")
}

#[tokio::test]
async fn test_remote_listing_matches_server_paging() {
    let server = TestServer::start().await;
    let store = server.client();

    let page = store.list(&demo(), PageRequest::new(1, 9)).await.unwrap();
    assert_eq!(page.items.len(), 9);
    assert_eq!(page.items[0].id, "1");
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.total_notes, 10);

    let page = store.list(&demo(), PageRequest::new(2, 9)).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "10");

    server.stop().await;
}

#[tokio::test]
async fn test_remote_crud_and_error_mapping() {
    let server = TestServer::start().await;
    let store = server.client();

    let note = store
        .create(&demo(), NewNote::new("Remote", "written over http").with_tags(["Net"]))
        .await
        .unwrap();
    assert_eq!(note.tags, vec!["net"]);
    assert_eq!(store.get(&demo(), &note.id).await.unwrap(), note);

    let updated = store
        .update(
            &demo(),
            &note.id,
            NoteUpdate {
                title: Some("Remote, edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Remote, edited");
    assert_eq!(updated.content, note.content);

    let err = store
        .create(&demo(), NewNote::new("", "no title"))
        .await
        .unwrap_err();
    assert!(matches!(err, NoteSyncError::Validation(ref m) if m == "title is required"));

    store.delete(&demo(), &note.id).await.unwrap();
    let err = store.get(&demo(), &note.id).await.unwrap_err();
    assert!(matches!(err, NoteSyncError::NoteNotFound(ref id) if *id == note.id));
    let err = store.delete(&demo(), &note.id).await.unwrap_err();
    assert!(matches!(err, NoteSyncError::NoteNotFound(_)));

    server.stop().await;
}

#[tokio::test]
async fn test_remote_search_and_suggest() {
    let server = TestServer::start().await;
    let store = server.client();

    let page = store
        .search(&demo(), &NoteQuery::new("meeting", Vec::<String>::new()), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "2");

    let page = store
        .search(&demo(), &NoteQuery::new("", ["travel", "recipe"]), PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = page.items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["6", "8"]);

    let tags = store
        .suggest("We had a team meeting about the project todo list")
        .await
        .unwrap();
    assert_eq!(tags, vec!["meeting", "todo"]);

    let err = store.suggest("short").await.unwrap_err();
    assert!(matches!(err, NoteSyncError::Validation(_)));

    server.stop().await;
}

#[tokio::test]
async fn test_session_over_remote_store() {
    let server = TestServer::start().await;
    let remote = Arc::new(server.client());

    let session = NoteSession::open(
        remote.clone(),
        remote,
        Arc::new(SessionIdentity::signed_in(demo())),
        9,
    )
    .await
    .unwrap();

    session.change_page(2).await.unwrap();
    session.submit_search("pasta", &["food"]).await.unwrap();
    let view = session.view().await;
    assert!(matches!(view.mode, SessionMode::Searching(_)));
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.notes[0].id, "6");

    session.clear_search().await.unwrap();
    let view = session.view().await;
    assert_eq!(view.mode, SessionMode::Browsing);
    assert_eq!(view.notes.len(), 9);

    session.delete_note("1").await.unwrap();
    let view = session.view().await;
    assert_eq!(view.notes.len(), 8);
    assert_eq!(view.pagination.total_notes, 9);

    server.stop().await;
}

#[tokio::test]
async fn test_stopped_server_is_transient_and_keeps_view() {
    let server = TestServer::start().await;
    let remote = Arc::new(server.client());
    let session = NoteSession::open(
        remote.clone(),
        remote,
        Arc::new(SessionIdentity::signed_in(demo())),
        9,
    )
    .await
    .unwrap();
    let before = session.view().await;

    server.stop().await;

    let err = session.change_page(2).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(session.view().await, before);
}
