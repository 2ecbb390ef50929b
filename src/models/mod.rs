mod assignment;
mod class_tag;
mod time_slot;
mod weekday;

pub use assignment::{Assignment, SlotKey};
pub use class_tag::{palette_color, ClassTag, PALETTE};
pub use time_slot::{SlotField, SlotTemplate, TimeOfDay, TimeSlot};
pub use weekday::{DayScope, Weekday};
