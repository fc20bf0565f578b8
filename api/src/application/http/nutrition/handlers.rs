pub mod demo_page;
pub mod get_profile;
pub mod submit_markup;
pub mod submit_session;
