//! Pure mapping from page state to what should be on screen.
//!
//! Front-ends never decide anything themselves; they apply a [`PageView`]
//! and send [`crate::app::Message`]s back.

use crate::{
    background::{Background, BackgroundImage},
    content::{SiteText, opacity},
    editor::{EditDialog, EditableField},
    modal::Modal,
    site::{ButtonKind, ButtonSpec, Configuration, SocialLinkSpec},
};

pub const BUTTON_CLASS: &str = "btn-hover-effect glass-card border-2 rounded-full px-8 py-3 \
    text-lg font-medium text-white hover:bg-white hover:bg-opacity-10 \
    hover:border-opacity-100 flex items-center";

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub document_title: String,
    pub title: String,
    pub subtitle: String,
    pub name: String,
    pub username: String,
    pub description: String,
    /// CSS colour of the dimming overlay.
    pub overlay_color: String,
    pub overlay_opacity: f64,
    /// Opacity of every element marked as opacity-controlled.
    pub text_opacity: f64,
    pub buttons: Vec<ButtonView>,
    pub social_links: Vec<SocialLinkView>,
    pub background: BackgroundView,
    pub modal: ModalView,
    pub edit_dialog: Option<EditDialogView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub element_id: String,
    pub border_color: String,
    pub border_opacity: f64,
    pub icon_class: String,
    pub text: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    Navigate { url: String, target: Option<String> },
    OpenModal { title: String, content: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocialLinkView {
    pub url: String,
    pub icon_class: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundView {
    /// `None` leaves whatever the stylesheet provides.
    pub image_css: Option<String>,
    /// The plain image URL when one is shown, for renderers without CSS.
    pub image_url: Option<String>,
    pub opacity: f64,
    pub info_text: String,
    pub retry_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModalView {
    pub visible: bool,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditDialogView {
    pub field: EditableField,
    pub prompt: String,
    pub multiline: bool,
    pub draft: String,
}

pub struct PageState<'a> {
    pub text: &'a SiteText,
    pub background: &'a Background,
    pub modal: &'a Modal,
    pub edit: Option<&'a EditDialog>,
}

pub fn render(config: &Configuration, state: &PageState<'_>) -> PageView {
    let border_opacity = opacity(config.styles.button_border_opacity);
    let overlay_opacity = opacity(config.styles.overlay_opacity);

    PageView {
        document_title: config.document_title(&state.text.title),
        title: state.text.title.clone(),
        subtitle: state.text.subtitle.clone(),
        name: config.site.name.clone(),
        username: config.site.username.clone(),
        description: state.text.description.clone(),
        overlay_color: format!("rgba(0, 0, 0, {overlay_opacity})"),
        overlay_opacity,
        text_opacity: opacity(config.styles.text_opacity),
        buttons: config
            .buttons
            .iter()
            .map(|b| button_view(b, border_opacity))
            .collect(),
        social_links: config.social_links.iter().map(social_link_view).collect(),
        background: background_view(state.background),
        modal: modal_view(state.modal),
        edit_dialog: state.edit.map(edit_dialog_view),
    }
}

fn button_view(spec: &ButtonSpec, border_opacity: f64) -> ButtonView {
    let action = match spec.kind {
        ButtonKind::Link => ButtonAction::Navigate {
            url: spec.url.clone().unwrap_or_default(),
            target: spec.target.clone(),
        },
        ButtonKind::Action => ButtonAction::OpenModal {
            title: spec.modal_title.clone().unwrap_or_default(),
            content: spec.modal_content.clone().unwrap_or_default(),
        },
    };
    ButtonView {
        element_id: format!("{}-btn", spec.id),
        border_color: format!("rgba(255, 255, 255, {border_opacity})"),
        border_opacity,
        icon_class: format!("{} mr-3 text-xl", spec.icon),
        text: spec.text.clone(),
        action,
    }
}

fn social_link_view(spec: &SocialLinkSpec) -> SocialLinkView {
    SocialLinkView {
        url: spec.url.clone(),
        icon_class: spec.icon.clone(),
        class: format!("opacity-80 hover:opacity-100 transition {}", spec.color),
    }
}

fn background_view(background: &Background) -> BackgroundView {
    let image_url = match &background.image {
        BackgroundImage::Url(url) => Some(url.clone()),
        _ => None,
    };
    BackgroundView {
        image_css: background.image.css_value(),
        image_url,
        opacity: background.opacity,
        info_text: background.info_text.clone(),
        retry_enabled: background.retry_enabled,
    }
}

fn modal_view(modal: &Modal) -> ModalView {
    match modal {
        Modal::Hidden => ModalView::default(),
        Modal::Visible { title, content } => ModalView {
            visible: true,
            title: title.clone(),
            content: content.clone(),
        },
    }
}

fn edit_dialog_view(dialog: &EditDialog) -> EditDialogView {
    EditDialogView {
        field: dialog.field,
        prompt: dialog.field.prompt(),
        multiline: dialog.field.is_multiline(),
        draft: dialog.draft.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::tests::sample;

    fn text() -> SiteText {
        SiteText {
            title: "T".into(),
            subtitle: "S".into(),
            description: "D".into(),
        }
    }

    #[test]
    fn test_render_static_fields() {
        let config = sample();
        let text = text();
        let background = Background::default();
        let modal = Modal::default();
        let view = render(
            &config,
            &PageState {
                text: &text,
                background: &background,
                modal: &modal,
                edit: None,
            },
        );

        assert_eq!(view.document_title, "Jane's Page | T");
        assert_eq!(view.name, "Jane");
        assert_eq!(view.username, "@jane");
        assert_eq!(view.description, "D");
        assert_eq!(view.overlay_color, "rgba(0, 0, 0, 0.4)");
        assert_eq!(view.text_opacity, 0.9);
        assert!(!view.modal.visible);
        assert_eq!(view.edit_dialog, None);
        assert_eq!(view.background.image_css, None);
    }

    #[test]
    fn test_render_buttons() {
        let config = sample();
        let text = text();
        let background = Background::default();
        let modal = Modal::default();
        let view = render(
            &config,
            &PageState {
                text: &text,
                background: &background,
                modal: &modal,
                edit: None,
            },
        );

        let [blog, about] = view.buttons.as_slice() else {
            panic!("expected two buttons");
        };
        assert_eq!(blog.element_id, "blog-btn");
        assert_eq!(blog.border_color, "rgba(255, 255, 255, 0.5)");
        assert_eq!(blog.icon_class, "fas fa-blog mr-3 text-xl");
        assert_eq!(
            blog.action,
            ButtonAction::Navigate {
                url: "https://blog.example.com".into(),
                target: Some("_blank".into())
            }
        );
        assert_eq!(about.element_id, "about-btn");
        assert_eq!(
            about.action,
            ButtonAction::OpenModal {
                title: "About me".into(),
                content: "<p>Hi</p>".into()
            }
        );

        assert_eq!(
            view.social_links[0].class,
            "opacity-80 hover:opacity-100 transition text-gray-200"
        );
    }

    #[test]
    fn test_render_edit_dialog() {
        let config = sample();
        let text = text();
        let background = Background::default();
        let modal = Modal::default();
        let dialog = EditDialog::open(EditableField::Description, "D");
        let view = render(
            &config,
            &PageState {
                text: &text,
                background: &background,
                modal: &modal,
                edit: Some(&dialog),
            },
        );

        let edit = view.edit_dialog.expect("dialog should be rendered");
        assert!(edit.multiline);
        assert_eq!(edit.prompt, "描述 (多行文本):");
        assert_eq!(edit.draft, "D");
    }
}
