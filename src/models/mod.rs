pub mod credentials;
pub mod integration_item;
pub mod oauth_state;
