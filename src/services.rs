pub mod auth;
pub mod contact_service;
pub mod group_service;
pub mod import_service;
