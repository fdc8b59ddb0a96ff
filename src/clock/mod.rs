pub(crate) mod loop_clock;
pub(crate) mod time_source;
