mod book;
mod client;
mod server;
mod storage;

pub use book::Notebook;
pub use client::NotesClient;
pub use server::{SharedStorage, serve};
pub use storage::{FileStorage, MemoryStorage};
