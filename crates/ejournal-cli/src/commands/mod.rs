mod import;
mod init;
mod list;
mod misc;
mod print;
mod rekey;
mod show;
mod write;

pub use import::handle_import;
pub use init::handle_init;
pub use list::handle_list;
pub use misc::handle_completions;
pub use print::handle_print;
pub use rekey::handle_rekey;
pub use show::handle_show;
pub use write::handle_write;
