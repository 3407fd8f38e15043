//! Inline editing of the title, subtitle and description.
//!
//! Editing is a dialog the front-end shows and later confirms or cancels,
//! so nothing ever blocks waiting for input.

use strum_macros::{Display, EnumIter};

use crate::cfg::PreferenceKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum EditableField {
    Title,
    Subtitle,
    Description,
}

impl EditableField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "标题",
            Self::Subtitle => "副标题",
            Self::Description => "描述",
        }
    }

    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Description)
    }

    pub fn prompt(self) -> String {
        if self.is_multiline() {
            format!("{} (多行文本):", self.label())
        } else {
            format!("输入新的{}:", self.label())
        }
    }

    pub const fn preference_key(self) -> PreferenceKey {
        match self {
            Self::Title => PreferenceKey::SiteTitle,
            Self::Subtitle => PreferenceKey::SiteSubtitle,
            Self::Description => PreferenceKey::SiteDescription,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub field: EditableField,
    pub draft: String,
}

impl EditDialog {
    pub fn open(field: EditableField, current: &str) -> Self {
        Self {
            field,
            draft: current.to_owned(),
        }
    }

    /// The value to commit, or `None` when the draft is blank.
    pub fn confirm(self) -> Option<String> {
        let trimmed = self.draft.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_prompts() {
        assert_eq!(EditableField::Title.prompt(), "输入新的标题:");
        assert_eq!(EditableField::Subtitle.prompt(), "输入新的副标题:");
        assert_eq!(EditableField::Description.prompt(), "描述 (多行文本):");
    }

    #[test]
    fn test_only_description_is_multiline() {
        let multiline: Vec<_> = EditableField::iter()
            .filter(|f| f.is_multiline())
            .collect();
        assert_eq!(multiline, [EditableField::Description]);
    }

    #[test]
    fn test_confirm_trims() {
        let mut dialog = EditDialog::open(EditableField::Title, "Old");
        assert_eq!(dialog.draft, "Old");
        dialog.draft = "  New title \n".into();
        assert_eq!(dialog.confirm().as_deref(), Some("New title"));
    }

    #[test]
    fn test_confirm_blank_is_none() {
        let mut dialog = EditDialog::open(EditableField::Description, "Old");
        dialog.draft = " \n\t ".into();
        assert_eq!(dialog.confirm(), None);
        assert_eq!(EditDialog::open(EditableField::Title, "").confirm(), None);
    }
}
