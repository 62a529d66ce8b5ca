pub mod burst_error;
