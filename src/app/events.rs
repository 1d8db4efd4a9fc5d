use crate::app::state::StudentForm;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Submit(StudentForm),
    OpenImage(usize),
    CloseViewer,
    Refresh,
}
