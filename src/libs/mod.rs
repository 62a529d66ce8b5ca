pub mod bitstream;
pub mod channel_codec;
pub mod channel_noise;
pub mod config_file;
pub mod error;
pub mod message_source;
pub mod util;
pub mod validator;
