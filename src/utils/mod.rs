pub mod image_url;
pub mod time;
pub mod validation;
