mod commands;
mod handlers;

pub use commands::{Cli, Commands, GlobalArgs};
pub use handlers::{
    handle_add, handle_delete, handle_get, handle_init, handle_list, handle_search, handle_serve,
    handle_suggest, handle_update, resolve_config,
};
