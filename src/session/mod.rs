/// Run configuration.
pub mod config;
/// Pipeline driver: prepare frames, render the timeline, stream to a sink.
pub mod morph_session;
