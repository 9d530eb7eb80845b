//! Core process state shared across tasks.

mod state;

pub use state::{
    begin_update, dev_server_running, end_update, is_shutdown, register_dev_server,
    register_watcher, setup_shutdown_handler, stop_dev_server,
};
