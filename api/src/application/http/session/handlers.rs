pub mod add_images;
pub mod analyze;
pub mod create_session;
pub mod delete_session;
pub mod edit_images;
pub mod generate_more;
pub mod get_image_preview;
pub mod get_session;
pub mod remove_image;
pub mod reset_session;
