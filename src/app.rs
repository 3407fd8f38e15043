//! The page controller: owns all state, reacts to [`Message`]s and asks the
//! front-end to run [`Effect`]s.

use std::time::Duration;

use rand::Rng;

use crate::{
    background::{Background, FADE_IN_DELAY, FetchError, ImageDescriptor},
    cfg::{PreferenceStore, Preferences},
    content::SiteText,
    editor::{EditDialog, EditableField},
    modal::{ClickTarget, Modal},
    render::{self, PageState, PageView},
    site::{ButtonKind, ConfigError, Configuration},
};

/// How long the startup error banner stays on screen.
pub const ERROR_NOTICE_DURATION: Duration = Duration::from_secs(5);
pub const CONFIG_ERROR_TEXT: &str = "无法加载配置，请检查网络连接或配置文件";

#[derive(Debug)]
pub enum Message {
    /// Index into the configured button list.
    ButtonPressed(usize),
    ModalClicked(ClickTarget),
    EditRequested(EditableField),
    EditDraftChanged(String),
    EditConfirmed,
    EditCancelled,
    BackgroundRequested,
    BackgroundLoaded(Result<ImageDescriptor, FetchError>),
    FadeInElapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchBackground { api_url: String },
    /// Deliver [`Message::FadeInElapsed`] after the delay.
    FadeInAfter(Duration),
}

/// The transient banner shown when the page cannot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub message: String,
    pub duration: Duration,
}

impl ErrorNotice {
    pub fn for_startup_failure(error: &ConfigError) -> Self {
        tracing::error!("failed to initialise page: {error}");
        Self {
            message: CONFIG_ERROR_TEXT.to_owned(),
            duration: ERROR_NOTICE_DURATION,
        }
    }
}

pub struct Page<S> {
    config: Configuration,
    text: SiteText,
    prefs: Preferences<S>,
    background: Background,
    modal: Modal,
    edit: Option<EditDialog>,
}

impl<S: PreferenceStore> Page<S> {
    pub fn new(config: Configuration, store: S, rng: &mut impl Rng) -> Self {
        let mut prefs = Preferences::new(store);
        let text = SiteText::resolve(&config, &mut prefs, rng);
        Self {
            config,
            text,
            prefs,
            background: Background::default(),
            modal: Modal::default(),
            edit: None,
        }
    }

    /// Effects to run once the first render is on screen.
    pub fn start(&mut self) -> Vec<Effect> {
        self.update(Message::BackgroundRequested)
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::ButtonPressed(index) => {
                let Some(button) = self.config.buttons.get(index) else {
                    tracing::warn!("no button at index {index}");
                    return vec![];
                };
                if button.kind == ButtonKind::Action {
                    self.modal.show(
                        button.modal_title.as_deref().unwrap_or_default(),
                        button.modal_content.as_deref().unwrap_or_default(),
                    );
                }
            }
            Message::ModalClicked(target) => self.modal.click(target),
            Message::EditRequested(field) => {
                self.edit = Some(EditDialog::open(field, self.field_text(field)));
            }
            Message::EditDraftChanged(draft) => {
                if let Some(dialog) = &mut self.edit {
                    dialog.draft = draft;
                }
            }
            Message::EditConfirmed => {
                if let Some(dialog) = self.edit.take() {
                    let field = dialog.field;
                    if let Some(value) = dialog.confirm() {
                        self.apply_edit(field, value);
                    }
                }
            }
            Message::EditCancelled => self.edit = None,
            Message::BackgroundRequested => {
                self.background.begin();
                return vec![Effect::FetchBackground {
                    api_url: self.config.background.api_url.clone(),
                }];
            }
            Message::BackgroundLoaded(Ok(descriptor)) => {
                tracing::debug!("background loaded: {}", descriptor.url);
                self.background.succeed(&descriptor, &mut self.prefs);
                return vec![Effect::FadeInAfter(FADE_IN_DELAY)];
            }
            Message::BackgroundLoaded(Err(e)) => {
                tracing::error!("failed to load background image: {e}");
                self.background
                    .fail(&self.config.background.default_background, &self.prefs);
            }
            Message::FadeInElapsed => self.background.fade_in(),
        }
        vec![]
    }

    fn field_text(&self, field: EditableField) -> &str {
        match field {
            EditableField::Title => &self.text.title,
            EditableField::Subtitle => &self.text.subtitle,
            EditableField::Description => &self.text.description,
        }
    }

    fn apply_edit(&mut self, field: EditableField, value: String) {
        self.prefs.set(field.preference_key(), &value);
        let slot = match field {
            EditableField::Title => &mut self.text.title,
            EditableField::Subtitle => &mut self.text.subtitle,
            EditableField::Description => &mut self.text.description,
        };
        *slot = value;
    }

    pub fn view(&self) -> PageView {
        render::render(
            &self.config,
            &PageState {
                text: &self.text,
                background: &self.background,
                modal: &self.modal,
                edit: self.edit.as_ref(),
            },
        )
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn text(&self) -> &SiteText {
        &self.text
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn background(&self) -> &Background {
        &self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        background::{BackgroundPhase, CACHED_TEXT},
        cfg::{MemoryStore, PreferenceKey},
        site::tests::sample,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn page() -> Page<MemoryStore> {
        Page::new(sample(), MemoryStore::default(), &mut StdRng::seed_from_u64(7))
    }

    fn descriptor() -> ImageDescriptor {
        ImageDescriptor {
            url: "https://x/img.png".into(),
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_start_requests_background() {
        let mut page = page();
        let effects = page.start();
        assert_eq!(
            effects,
            [Effect::FetchBackground {
                api_url: "https://img.example.com/random".into()
            }]
        );
        assert!(!page.view().background.retry_enabled);
    }

    #[test]
    fn test_background_success_fades_in() {
        let mut page = page();
        page.start();
        let effects = page.update(Message::BackgroundLoaded(Ok(descriptor())));
        assert_eq!(effects, [Effect::FadeInAfter(FADE_IN_DELAY)]);

        let view = page.view();
        assert_eq!(view.background.image_url.as_deref(), Some("https://x/img.png"));
        assert_eq!(view.background.info_text, "尺寸: 800 × 600");
        assert_eq!(view.background.opacity, 0.0);
        assert!(view.background.retry_enabled);
        assert_eq!(
            page.preferences().last_background_url().as_deref(),
            Some("https://x/img.png")
        );

        page.update(Message::FadeInElapsed);
        assert_eq!(page.view().background.opacity, 1.0);
    }

    #[test]
    fn test_background_failure_after_success_uses_cache() {
        let mut page = page();
        page.start();
        page.update(Message::BackgroundLoaded(Ok(descriptor())));

        page.update(Message::BackgroundRequested);
        let effects = page.update(Message::BackgroundLoaded(Err(FetchError::Status(503))));
        assert!(effects.is_empty());

        let view = page.view();
        assert_eq!(page.background().phase, BackgroundPhase::Failed);
        assert_eq!(view.background.image_url.as_deref(), Some("https://x/img.png"));
        assert_eq!(view.background.info_text, CACHED_TEXT);
        assert!(view.background.retry_enabled);
    }

    #[test]
    fn test_overlapping_fetches_last_completion_wins() {
        let mut page = page();
        page.start();
        page.update(Message::BackgroundRequested);
        page.update(Message::BackgroundLoaded(Ok(descriptor())));
        page.update(Message::BackgroundLoaded(Ok(ImageDescriptor {
            url: "https://x/second.png".into(),
            width: 1.0,
            height: 2.0,
        })));
        assert_eq!(
            page.view().background.image_url.as_deref(),
            Some("https://x/second.png")
        );
    }

    #[test]
    fn test_action_button_opens_modal() {
        let mut page = page();
        page.update(Message::ButtonPressed(1));
        let modal = page.view().modal;
        assert!(modal.visible);
        assert_eq!(modal.title, "About me");
        assert_eq!(modal.content, "<p>Hi</p>");

        page.update(Message::ModalClicked(ClickTarget::Content));
        assert!(page.view().modal.visible);
        page.update(Message::ModalClicked(ClickTarget::Scrim));
        assert!(!page.view().modal.visible);
    }

    #[test]
    fn test_link_button_and_bad_index_leave_modal_hidden() {
        let mut page = page();
        page.update(Message::ButtonPressed(0));
        page.update(Message::ButtonPressed(99));
        assert!(!page.view().modal.visible);
    }

    #[test]
    fn test_edit_title_updates_document_title() {
        let mut page = page();
        page.update(Message::EditRequested(EditableField::Title));
        let dialog = page.view().edit_dialog.expect("dialog should be open");
        assert_eq!(dialog.draft, page.text().title);
        assert!(!dialog.multiline);

        page.update(Message::EditDraftChanged("  Fresh  ".into()));
        page.update(Message::EditConfirmed);

        let view = page.view();
        assert_eq!(view.edit_dialog, None);
        assert_eq!(view.title, "Fresh");
        assert_eq!(view.document_title, "Jane's Page | Fresh");
        assert_eq!(
            page.preferences().get(PreferenceKey::SiteTitle).as_deref(),
            Some("Fresh")
        );
    }

    #[test]
    fn test_whitespace_description_edit_is_ignored() {
        let mut page = page();
        page.update(Message::EditRequested(EditableField::Description));
        page.update(Message::EditDraftChanged(" \n ".into()));
        page.update(Message::EditConfirmed);

        assert_eq!(page.view().description, "Writes code.");
        assert_eq!(page.preferences().get(PreferenceKey::SiteDescription), None);
    }

    #[test]
    fn test_cancelled_edit_changes_nothing() {
        let mut page = page();
        let before = page.text().clone();
        page.update(Message::EditRequested(EditableField::Subtitle));
        page.update(Message::EditDraftChanged("Other".into()));
        page.update(Message::EditCancelled);

        assert_eq!(page.text(), &before);
        assert_eq!(page.view().edit_dialog, None);
    }

    #[test]
    fn test_edited_description_survives_reload() {
        let mut page = page();
        page.update(Message::EditRequested(EditableField::Description));
        page.update(Message::EditDraftChanged("New bio".into()));
        page.update(Message::EditConfirmed);

        let store = page.preferences().store().clone();
        let reloaded = Page::new(sample(), store, &mut StdRng::seed_from_u64(99));
        assert_eq!(reloaded.text().description, "New bio");
        assert_eq!(reloaded.text().title, page.text().title);
    }

    #[cfg(not(target_family = "wasm"))]
    #[test]
    fn test_page_survives_failing_storage() {
        use crate::cfg::tests::ReadOnlyStore;

        let mut page = Page::new(
            sample(),
            ReadOnlyStore::default(),
            &mut StdRng::seed_from_u64(3),
        );
        assert!(sample().site.title_options.contains(&page.text().title));

        page.update(Message::EditRequested(EditableField::Title));
        page.update(Message::EditDraftChanged("Kept".into()));
        page.update(Message::EditConfirmed);
        assert_eq!(page.view().title, "Kept");
        assert_eq!(page.preferences().get(PreferenceKey::SiteTitle), None);

        page.start();
        page.update(Message::BackgroundLoaded(Ok(descriptor())));
        let view = page.view();
        assert_eq!(view.background.image_url.as_deref(), Some("https://x/img.png"));
        assert!(view.background.retry_enabled);
    }

    #[test]
    fn test_startup_failure_notice() {
        let error = Configuration::parse("nope").unwrap_err();
        let notice = ErrorNotice::for_startup_failure(&error);
        assert_eq!(notice.message, CONFIG_ERROR_TEXT);
        assert_eq!(notice.duration, Duration::from_secs(5));
    }
}
