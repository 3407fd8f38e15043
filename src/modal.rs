//! The single reusable overlay opened by action buttons.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Hidden,
    Visible {
        title: String,
        content: String,
    },
}

/// Where a click inside the modal's area landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed backdrop around the panel.
    Scrim,
    /// Anywhere inside the panel.
    Content,
    CloseButton,
}

impl Modal {
    pub fn show(&mut self, title: &str, content: &str) {
        *self = Self::Visible {
            title: title.to_owned(),
            content: content.to_owned(),
        };
    }

    pub fn hide(&mut self) {
        *self = Self::Hidden;
    }

    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Scrim | ClickTarget::CloseButton => self.hide(),
            ClickTarget::Content => (),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_sets_text() {
        let mut modal = Modal::default();
        assert!(!modal.is_visible());
        modal.show("About", "<p>Hi</p>");
        assert_eq!(
            modal,
            Modal::Visible {
                title: "About".into(),
                content: "<p>Hi</p>".into()
            }
        );
    }

    #[test]
    fn test_content_click_keeps_open() {
        let mut modal = Modal::default();
        modal.show("About", "Hi");
        modal.click(ClickTarget::Content);
        assert!(modal.is_visible());
        modal.click(ClickTarget::Scrim);
        assert!(!modal.is_visible());
    }

    #[test]
    fn test_close_button() {
        let mut modal = Modal::default();
        modal.show("About", "Hi");
        modal.click(ClickTarget::CloseButton);
        assert_eq!(modal, Modal::Hidden);
        // Clicking while hidden is harmless.
        modal.click(ClickTarget::Scrim);
        assert_eq!(modal, Modal::Hidden);
    }
}
