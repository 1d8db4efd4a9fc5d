use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::presenter::{FullView, PresenterError, TablePresenter};
use crate::app::state::StudentForm;
use crate::catalog::{RecordStore, StoreError};
use crate::imaging::ImageResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    RejectedIncomplete,
    RejectedDuplicate,
    RejectedStorageError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message shown to the user in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            title,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, "Warning", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, "Error", message)
    }
}

impl SubmitOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Accepted => Notice::new(
                NoticeLevel::Info,
                "Success",
                "Student information saved successfully!",
            ),
            Self::RejectedIncomplete => Notice::new(
                NoticeLevel::Warning,
                "Warning",
                "All fields must be filled out.",
            ),
            Self::RejectedDuplicate => Notice::error("A student with this ID already exists."),
            Self::RejectedStorageError(reason) => {
                Notice::error(format!("An error occurred: {reason}"))
            }
        }
    }
}

/// Owns the process-wide store, the image resolver and the table presenter.
/// Every write is followed by a synchronous re-read so the table always shows
/// what is in the store.
pub struct FormController {
    store: Box<dyn RecordStore>,
    resolver: Box<dyn ImageResolver>,
    presenter: TablePresenter,
}

impl FormController {
    pub fn new(store: Box<dyn RecordStore>, resolver: Box<dyn ImageResolver>) -> Self {
        Self {
            store,
            resolver,
            presenter: TablePresenter::new(),
        }
    }

    pub fn bootstrap(&mut self) -> Result<(), StoreError> {
        self.store.initialize()?;
        self.refresh()
    }

    pub fn submit(&mut self, form: &StudentForm) -> SubmitOutcome {
        if !form.is_complete() {
            return SubmitOutcome::RejectedIncomplete;
        }

        match self.store.add_record(&form.as_new_student()) {
            Ok(id) => {
                info!("saved student {} as record {id}", form.student_id);
                if let Err(error) = self.refresh() {
                    error!("failed to refresh table after saving record {id}: {error}");
                }
                SubmitOutcome::Accepted
            }
            Err(StoreError::DuplicateKey(student_id)) => {
                warn!("rejected duplicate student id {student_id}");
                SubmitOutcome::RejectedDuplicate
            }
            Err(StoreError::StorageFailure(reason)) => {
                error!("failed to save student {}: {reason}", form.student_id);
                SubmitOutcome::RejectedStorageError(reason)
            }
        }
    }

    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let records = self.store.list_records()?;
        self.presenter.render(&records, self.resolver.as_ref());
        Ok(())
    }

    pub fn activate_image(&mut self, row: usize) -> Result<&FullView, PresenterError> {
        self.presenter.activate_image(row, self.resolver.as_ref())
    }

    pub fn close_viewer(&mut self) {
        self.presenter.close_viewer();
    }

    /// Applies one UI event and returns the dialog to show, if any.
    pub fn dispatch(&mut self, event: AppEvent) -> Option<Notice> {
        match event {
            AppEvent::Submit(form) => Some(self.submit(&form).notice()),
            AppEvent::OpenImage(row) => match self.activate_image(row) {
                Ok(_) => None,
                Err(error) => {
                    warn!("failed to open full image for row {row}: {error}");
                    Some(Notice::error(error.to_string()))
                }
            },
            AppEvent::CloseViewer => {
                self.close_viewer();
                None
            }
            AppEvent::Refresh => match self.refresh() {
                Ok(()) => None,
                Err(error) => {
                    error!("failed to refresh table: {error}");
                    Some(Notice::error(format!("An error occurred: {error}")))
                }
            },
        }
    }

    pub fn presenter(&self) -> &TablePresenter {
        &self.presenter
    }

    #[cfg(test)]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn shutdown(self) -> Result<(), StoreError> {
        self.store.close()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::app::test_support::{BrokenStore, RecordingResolver};
    use crate::catalog::SqliteRecordStore;
    use crate::imaging::{ImageError, RenderedImage};

    /// Shares the recording resolver between the controller and the test.
    struct SharedResolver(std::rc::Rc<RecordingResolver>);

    impl ImageResolver for SharedResolver {
        fn load_thumbnail(&self, path: &Path) -> Result<RenderedImage, ImageError> {
            self.0.load_thumbnail(path)
        }

        fn load_full_view(&self, path: &Path) -> Result<RenderedImage, ImageError> {
            self.0.load_full_view(path)
        }
    }

    fn controller() -> (FormController, std::rc::Rc<RecordingResolver>) {
        let resolver = std::rc::Rc::new(RecordingResolver::default());
        let store = SqliteRecordStore::open_in_memory().expect("store should open");
        let mut controller = FormController::new(
            Box::new(store),
            Box::new(SharedResolver(resolver.clone())),
        );
        controller.bootstrap().expect("bootstrap should succeed");
        (controller, resolver)
    }

    fn ada() -> StudentForm {
        StudentForm::new("Ada Lovelace", "S-100", "Fall", "/images/ada.png")
    }

    #[test]
    fn accepted_submission_is_stored_rendered_and_viewable() {
        let (mut controller, resolver) = controller();

        assert_eq!(controller.submit(&ada()), SubmitOutcome::Accepted);

        let records = controller.store().list_records().expect("list");
        assert_eq!(records.len(), 1);
        let id = records[0].id;
        assert!(id.get() > 0);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].student_id, "S-100");
        assert_eq!(records[0].semester, "Fall");
        assert_eq!(records[0].picture_path, "/images/ada.png");

        let rows = controller.presenter().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_id, id);

        let view = controller.activate_image(0).expect("full view should open");
        assert_eq!(view.picture_path, "/images/ada.png");
        assert_eq!(resolver.full_view_calls(), vec!["/images/ada.png"]);
    }

    #[test]
    fn duplicate_submission_leaves_original_record_untouched() {
        let (mut controller, _resolver) = controller();
        assert_eq!(controller.submit(&ada()), SubmitOutcome::Accepted);

        let outcome = controller.submit(&StudentForm::new(
            "Augusta King",
            "S-100",
            "Spring",
            "/images/other.png",
        ));

        assert_eq!(outcome, SubmitOutcome::RejectedDuplicate);
        let records = controller.store().list_records().expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].semester, "Fall");
        assert_eq!(records[0].picture_path, "/images/ada.png");
    }

    #[test]
    fn incomplete_submission_writes_nothing() {
        let (mut controller, resolver) = controller();
        let generation = controller.presenter().generation();

        for blanked in 0..4 {
            let mut form = ada();
            match blanked {
                0 => form.name.clear(),
                1 => form.student_id.clear(),
                2 => form.semester.clear(),
                _ => form.picture_path.clear(),
            }
            assert_eq!(controller.submit(&form), SubmitOutcome::RejectedIncomplete);
        }

        assert!(controller.store().list_records().expect("list").is_empty());
        assert_eq!(controller.presenter().generation(), generation);
        assert!(resolver.thumbnail_calls().is_empty());
    }

    #[test]
    fn storage_failure_is_reported_not_fatal() {
        let mut controller = FormController::new(
            Box::new(BrokenStore),
            Box::new(RecordingResolver::default()),
        );

        let outcome = controller.submit(&ada());

        assert!(matches!(outcome, SubmitOutcome::RejectedStorageError(_)));
        let notice = outcome.notice();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("An error occurred: "));
        assert_eq!(
            controller.submit(&StudentForm::default()),
            SubmitOutcome::RejectedIncomplete
        );
    }

    #[test]
    fn notices_use_user_facing_wording() {
        assert_eq!(
            SubmitOutcome::Accepted.notice().message,
            "Student information saved successfully!"
        );
        assert_eq!(
            SubmitOutcome::RejectedIncomplete.notice(),
            Notice::new(
                NoticeLevel::Warning,
                "Warning",
                "All fields must be filled out."
            )
        );
        assert_eq!(
            SubmitOutcome::RejectedDuplicate.notice().message,
            "A student with this ID already exists."
        );
    }

    #[test]
    fn dispatch_routes_events_and_reports_image_errors() {
        let resolver = std::rc::Rc::new(RecordingResolver::failing_on("/images/missing.png"));
        let store = SqliteRecordStore::open_in_memory().expect("store should open");
        let mut controller = FormController::new(
            Box::new(store),
            Box::new(SharedResolver(resolver.clone())),
        );
        controller.bootstrap().expect("bootstrap should succeed");

        let saved = controller
            .dispatch(AppEvent::Submit(StudentForm::new(
                "Ada Lovelace",
                "S-100",
                "Fall",
                "/images/missing.png",
            )))
            .expect("submit always produces a notice");
        assert_eq!(saved.level, NoticeLevel::Info);
        assert_eq!(controller.presenter().rows().len(), 1);
        assert!(controller.presenter().rows()[0].thumbnail.is_none());

        let failed = controller
            .dispatch(AppEvent::OpenImage(0))
            .expect("missing image should be reported");
        assert_eq!(failed.level, NoticeLevel::Error);
        assert!(controller.presenter().viewer().is_none());

        assert!(controller.dispatch(AppEvent::OpenImage(5)).is_some());
        assert!(controller.dispatch(AppEvent::Refresh).is_none());
        assert!(controller.dispatch(AppEvent::CloseViewer).is_none());
    }

    #[test]
    fn refresh_event_rereads_the_store() {
        let (mut controller, _resolver) = controller();
        controller
            .store()
            .add_record(&ada().as_new_student())
            .expect("insert should succeed");
        assert!(controller.presenter().rows().is_empty());

        assert!(controller.dispatch(AppEvent::Refresh).is_none());

        let rows = controller.presenter().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, "S-100");
    }

    #[test]
    fn refresh_event_reports_storage_failure() {
        let mut controller = FormController::new(
            Box::new(BrokenStore),
            Box::new(RecordingResolver::default()),
        );

        let notice = controller
            .dispatch(AppEvent::Refresh)
            .expect("failed refresh should be reported");

        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("disk I/O error"));
    }

    #[test]
    fn bootstrap_renders_existing_records() {
        let store = SqliteRecordStore::open_in_memory().expect("store should open");
        store.initialize().expect("initialize");
        store
            .add_record(&ada().as_new_student())
            .expect("insert should succeed");

        let mut controller =
            FormController::new(Box::new(store), Box::new(RecordingResolver::default()));
        controller.bootstrap().expect("bootstrap should succeed");

        assert_eq!(controller.presenter().rows().len(), 1);
        controller.shutdown().expect("store should close");
    }
}
