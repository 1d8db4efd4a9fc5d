pub mod controller;
pub mod events;
pub mod presenter;
pub mod state;

#[cfg(test)]
mod test_support;

pub use controller::{FormController, Notice, NoticeLevel};
pub use events::AppEvent;
pub use state::StudentForm;
