pub mod chat_message;
pub mod detections_table;
pub mod header;
pub mod progress_panel;
pub mod upload_form;
pub mod utils;
