use crate::catalog::NewStudent;

/// Editable form fields. The picture path is filled in by the file picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub student_id: String,
    pub semester: String,
    pub picture_path: String,
}

impl StudentForm {
    #[cfg(test)]
    pub fn new(
        name: impl Into<String>,
        student_id: impl Into<String>,
        semester: impl Into<String>,
        picture_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            student_id: student_id.into(),
            semester: semester.into(),
            picture_path: picture_path.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.student_id,
            &self.semester,
            &self.picture_path,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }

    pub fn as_new_student(&self) -> NewStudent<'_> {
        NewStudent {
            name: &self.name,
            student_id: &self.student_id,
            semester: &self.semester,
            picture_path: &self.picture_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_is_complete_only_when_every_field_is_filled() {
        let full = StudentForm::new("Ada", "S-1", "Fall", "ada.png");
        assert!(full.is_complete());

        for blanked in 0..4 {
            let mut form = full.clone();
            match blanked {
                0 => form.name.clear(),
                1 => form.student_id.clear(),
                2 => form.semester.clear(),
                _ => form.picture_path.clear(),
            }
            assert!(!form.is_complete(), "field {blanked} should be required");
        }
    }

    #[test]
    fn whitespace_counts_as_present() {
        let form = StudentForm::new(" ", "S-1", "Fall", "ada.png");
        assert!(form.is_complete());
    }
}
