use std::io::{self, Read};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::commands::GlobalArgs;
use crate::auth::SessionIdentity;
use crate::config::Config;
use crate::entity::{normalize_tags, NewNote, Note, NoteUpdate, OwnerId};
use crate::error::{NoteSyncError, Result};
use crate::search::{parse_query, Page};
use crate::server::{self, AppState};
use crate::session::{NoteSession, SessionView};
use crate::storage::{HttpNoteStore, InMemoryNoteStore, NoteStore};
use crate::suggest::{exclude_existing, KeywordTagSuggester, TagSuggester};

/// Load the config file and apply command-line overrides.
pub fn resolve_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref())?;
    if let Some(ref data_file) = global.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(ref server) = global.server {
        config.server_url = Some(server.clone());
    }
    if let Some(ref user) = global.user {
        config.user_id = user.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Store and suggester for this config: remote when `server_url` is set,
/// otherwise the local snapshot file (which must already exist).
fn backend(config: &Config) -> Result<(Arc<dyn NoteStore>, Arc<dyn TagSuggester>)> {
    match config.server_url {
        Some(ref url) => {
            let remote = Arc::new(HttpNoteStore::new(url, config.request_timeout())?);
            Ok((remote.clone(), remote))
        }
        None => {
            let local = Arc::new(InMemoryNoteStore::open(&config.data_file)?);
            Ok((local, Arc::new(KeywordTagSuggester::new())))
        }
    }
}

/// Suggester alone; the local one needs no initialized store.
fn suggester(config: &Config) -> Result<Arc<dyn TagSuggester>> {
    match config.server_url {
        Some(ref url) => Ok(Arc::new(HttpNoteStore::new(url, config.request_timeout())?)),
        None => Ok(Arc::new(KeywordTagSuggester::new())),
    }
}

fn session(config: &Config) -> Result<NoteSession> {
    let (store, suggester) = backend(config)?;
    let identity = SessionIdentity::signed_in(OwnerId::new(config.user_id.clone()));
    Ok(NoteSession::new(store, suggester, Arc::new(identity), config.page_limit))
}

fn require_page(page: usize) -> Result<()> {
    if page == 0 {
        return Err(NoteSyncError::validation("page must be at least 1"));
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn print_note_line(note: &Note) {
    println!("  {}  {}", note.id, note.title);
    if !note.tags.is_empty() {
        println!("      tags: {}", note.tags.join(", "));
    }
    println!("      {}", note.summary.replace('\n', " "));
}

fn print_note(note: &Note) {
    println!("Note {}", note.id);
    println!("Title: {}", note.title);
    println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M"));
    if !note.tags.is_empty() {
        println!("Tags: {}", note.tags.join(", "));
    }
    println!();
    println!("{}", note.content);
}

fn print_view(view: SessionView, json: bool) -> Result<()> {
    if json {
        let page = Page {
            items: view.notes,
            pagination: view.pagination,
        };
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let p = view.pagination;
    if view.notes.is_empty() {
        if view.is_searching() {
            println!("No notes match your search.");
        } else {
            println!("No notes found.");
        }
        if p.total_notes > 0 {
            println!("(page {} of {}, {} notes)", p.current_page, p.total_pages, p.total_notes);
        }
        return Ok(());
    }

    println!(
        "Notes (page {} of {}, {} total):\n",
        p.current_page, p.total_pages, p.total_notes
    );
    for note in &view.notes {
        print_note_line(note);
    }
    Ok(())
}

pub fn handle_init(config: &Config, sample: bool) -> Result<()> {
    if config.server_url.is_some() {
        return Err(NoteSyncError::Config(
            "init only applies to the local store; unset server_url".to_string(),
        ));
    }
    let owner = OwnerId::new(config.user_id.clone());
    let sample_owner = sample.then_some(&owner);
    InMemoryNoteStore::init(&config.data_file, sample_owner)?;

    println!("Initialized note store at {}", config.data_file.display());
    if sample {
        println!("  (added demo notes for user {})", owner);
    }
    Ok(())
}

pub async fn handle_serve(config: &Config, bind: Option<String>, sample: bool) -> Result<()> {
    let store: Arc<dyn NoteStore> = if sample {
        Arc::new(InMemoryNoteStore::with_samples(&OwnerId::new(config.user_id.clone())))
    } else {
        Arc::new(InMemoryNoteStore::open_or_init(&config.data_file, None)?)
    };
    let state = AppState {
        store,
        suggester: Arc::new(KeywordTagSuggester::new()),
        default_limit: config.page_limit,
    };

    let bind = bind.unwrap_or_else(|| config.bind.clone());
    let listener = TcpListener::bind(&bind).await?;
    println!("Listening on http://{}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown requested"),
            Err(e) => warn!("cannot listen for ctrl-c: {}", e),
        }
        trigger.cancel();
    });

    server::serve(listener, state, shutdown).await
}

pub async fn handle_list(config: &Config, page: usize, json: bool) -> Result<()> {
    require_page(page)?;
    let session = session(config)?;
    session.change_page(page).await?;
    print_view(session.view().await, json)
}

pub async fn handle_get(config: &Config, id: String, json: bool) -> Result<()> {
    let note = session(config)?.get_note(&id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note(&note);
    }
    Ok(())
}

pub async fn handle_add(
    config: &Config,
    title: String,
    content: Option<String>,
    stdin: bool,
    tags: Vec<String>,
    json: bool,
) -> Result<()> {
    let content = if stdin {
        read_stdin()?
    } else {
        content.unwrap_or_default()
    };

    let note = session(config)?
        .create_note(NewNote::new(title, content).with_tags(tags))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note {}: {}", note.id, note.title);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_update(
    config: &Config,
    id: String,
    title: Option<String>,
    content: Option<String>,
    stdin: bool,
    tags: Vec<String>,
    clear_tags: bool,
    json: bool,
) -> Result<()> {
    let content = if stdin { Some(read_stdin()?) } else { content };
    let tags = if clear_tags {
        Some(Vec::new())
    } else if tags.is_empty() {
        None
    } else {
        Some(tags)
    };

    let update = NoteUpdate {
        title,
        content,
        tags,
    };
    if update.is_empty() {
        return Err(NoteSyncError::validation(
            "nothing to update; pass --title, --content, --tag or --clear-tags",
        ));
    }

    let note = session(config)?.update_note(&id, update).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Updated note {}: {}", note.id, note.title);
    }
    Ok(())
}

pub async fn handle_delete(config: &Config, id: String) -> Result<()> {
    session(config)?.delete_note(&id).await?;
    println!("Deleted note {}", id);
    Ok(())
}

pub async fn handle_search(
    config: &Config,
    query: Option<String>,
    tags: Vec<String>,
    page: usize,
    json: bool,
) -> Result<()> {
    require_page(page)?;
    let mut parsed = parse_query(query.as_deref().unwrap_or(""));
    parsed.tags.extend(tags);

    let session = session(config)?;
    session
        .submit_search_at(&parsed.text, &parsed.tags, page)
        .await?;
    print_view(session.view().await, json)
}

pub async fn handle_suggest(
    config: &Config,
    content: String,
    exclude: Vec<String>,
    json: bool,
) -> Result<()> {
    let exclude = normalize_tags(&exclude);
    let suggested = suggester(config)?.suggest(&content).await?;
    let tags = exclude_existing(suggested, &exclude);

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if tags.is_empty() {
        println!("No new tags to suggest.");
    } else {
        println!("Suggested tags: {}", tags.join(", "));
    }
    Ok(())
}
