pub mod availability;
pub mod clock;
pub mod days;
pub mod entry;
pub mod selector;
pub mod slots;
pub mod subject;
pub mod timetable;
