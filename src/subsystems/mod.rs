mod event_listeners;
mod web_server;

pub use event_listeners::EventListeners;
pub use web_server::WebServer;
