//! Third-party integrations. Each provider owns its OAuth flow and its
//! mapping into `IntegrationItem`s.

pub mod hubspot;
