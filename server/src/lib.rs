pub mod connection;
pub mod games;
pub mod lobby;
pub mod matchmaker;
pub mod server_config;
pub mod session_registry;
pub mod web_server;
pub mod ws_handler;

#[cfg(test)]
pub(crate) mod test_support;
