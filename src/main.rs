use clap::Parser;
use notesync::cli::{
    handle_add, handle_delete, handle_get, handle_init, handle_list, handle_search, handle_serve,
    handle_suggest, handle_update, resolve_config, Cli, Commands,
};
use notesync::{logging, Result};

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli.global)?;
    logging::init(&config.log_filter);

    match cli.command {
        Commands::Init { sample } => handle_init(&config, sample),
        Commands::Serve { bind, sample } => handle_serve(&config, bind, sample).await,
        Commands::List { page, json } => handle_list(&config, page, json).await,
        Commands::Get { id, json } => handle_get(&config, id, json).await,
        Commands::Add {
            title,
            content,
            stdin,
            tags,
            json,
        } => handle_add(&config, title, content, stdin, tags, json).await,
        Commands::Update {
            id,
            title,
            content,
            stdin,
            tags,
            clear_tags,
            json,
        } => handle_update(&config, id, title, content, stdin, tags, clear_tags, json).await,
        Commands::Delete { id } => handle_delete(&config, id).await,
        Commands::Search {
            query,
            tags,
            page,
            json,
        } => handle_search(&config, query, tags, page, json).await,
        Commands::Suggest {
            content,
            exclude,
            json,
        } => handle_suggest(&config, content, exclude, json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
