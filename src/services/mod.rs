pub mod result_writer;
pub mod tutor_service;

pub use result_writer::{ResultWriter, MARKDOWN_CONTENT_TYPE};
pub use tutor_service::TutorService;
