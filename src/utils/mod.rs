mod perf;
mod time_utils;

pub use time_utils::{AppInstant, TimeUtils, epoch_sec_to_label, naive_to_label};
