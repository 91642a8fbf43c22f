//! Background services shared by the TUI and CLI

pub mod tutor;

pub use tutor::{TutorClient, TutorRequest};
