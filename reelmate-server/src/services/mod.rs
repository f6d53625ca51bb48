pub mod auth_service;
pub mod match_service;
pub mod partner_service;
pub mod token_service;
