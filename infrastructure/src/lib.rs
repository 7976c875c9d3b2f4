pub mod config;
pub mod openai_client;
