//! Rolling: a trigger decides *when* the active file is retired, a roller decides
//! *how* (renaming, pruning, compressing).

mod numbered;
mod size;
mod time;

pub use numbered::NumberedFileRoller;
pub use size::{SizeFileRollTrigger, format_size, parse_size};
pub use time::{Period, TimeFileRoller, check_file_name_pattern};

use crate::error::Result;
use crate::logger::LogEvent;
use std::path::Path;

pub trait FileRollTrigger: Send + Sync {
    /// Checked before every write to `active`.
    fn is_triggered(&self, active: &Path, event: &LogEvent) -> bool;

    fn type_name(&self) -> &'static str;
}

pub trait FileRoller: Send + Sync {
    /// Retires `active`; the writer reopens it afterwards. `active` is closed when this runs.
    ///
    /// # Errors
    /// I/O errors while renaming, deleting, or compressing rolled files.
    fn roll(&self, active: &Path) -> Result<()>;

    /// Rollers that know their own schedule can stand in for a trigger.
    fn as_trigger(&self) -> Option<&dyn FileRollTrigger> {
        None
    }

    fn type_name(&self) -> &'static str;
}
