pub mod diary_service;

pub use diary_service::DiaryService;
