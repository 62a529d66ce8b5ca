pub mod message_source;
