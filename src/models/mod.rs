pub mod diary;
pub mod diary_input;

pub use diary::{DiaryEntry, NewEntry};
pub use diary_input::{CreateEntryForm, CreateEntryInput, DiaryMutationResponse, ImageUpload};
