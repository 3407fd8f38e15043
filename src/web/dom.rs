//! Binding between a [`PageView`] and the page's fixed mount points.

use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlDialogElement, HtmlElement,
    HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, Node,
};

use super::App;
use crate::{
    app::{ErrorNotice, Message},
    editor::EditableField,
    modal::ClickTarget,
    render::{BUTTON_CLASS, ButtonAction, ButtonView, EditDialogView, PageView, SocialLinkView},
};

const BUTTON_INDEX_ATTR: &str = "data-button-index";
const ERROR_BANNER_CLASS: &str =
    "fixed top-4 right-4 bg-red-500 text-white p-4 rounded-lg shadow-lg z-50";

#[derive(Debug, Error)]
pub(crate) enum BindError {
    #[error("no global `window`/`document`")]
    NoDocument,
    #[error("element #{0} not found")]
    Missing(&'static str),
    #[error("element #{0} has an unexpected type")]
    WrongType(&'static str),
    #[error("could not create element: {0:?}")]
    Create(JsValue),
}

pub(crate) struct EditDialogElements {
    dialog: HtmlDialogElement,
    prompt: HtmlElement,
    input: HtmlInputElement,
    textarea: HtmlTextAreaElement,
    confirm: HtmlButtonElement,
    cancel: HtmlButtonElement,
}

pub(crate) struct Mounts {
    document: Document,
    background: HtmlElement,
    overlay: HtmlElement,
    title: HtmlElement,
    subtitle: HtmlElement,
    name: HtmlElement,
    username: HtmlElement,
    description: HtmlElement,
    buttons: HtmlElement,
    social_links: HtmlElement,
    image_info: HtmlElement,
    change_background: HtmlButtonElement,
    modal: HtmlElement,
    close_modal: HtmlElement,
    modal_title: HtmlElement,
    modal_content: HtmlElement,
    edit: EditDialogElements,
    last: Option<PageView>,
}

pub(crate) fn document() -> Result<Document, BindError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(BindError::NoDocument)
}

fn by_id<T: JsCast>(document: &Document, id: &'static str) -> Result<T, BindError> {
    document
        .get_element_by_id(id)
        .ok_or(BindError::Missing(id))?
        .dyn_into::<T>()
        .map_err(|_| BindError::WrongType(id))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, BindError> {
    document
        .create_element(tag)
        .map_err(BindError::Create)?
        .dyn_into::<T>()
        .map_err(|e| BindError::Create(e.into()))
}

impl Mounts {
    pub(crate) fn bind(document: Document) -> Result<Self, BindError> {
        let edit = build_edit_dialog(&document)?;
        Ok(Self {
            background: by_id(&document, "background-container")?,
            overlay: by_id(&document, "overlay")?,
            title: by_id(&document, "title-text")?,
            subtitle: by_id(&document, "subtitle-text")?,
            name: by_id(&document, "name-text")?,
            username: by_id(&document, "username-text")?,
            description: by_id(&document, "description-text")?,
            buttons: by_id(&document, "buttons-container")?,
            social_links: by_id(&document, "social-links")?,
            image_info: by_id(&document, "image-info")?,
            change_background: by_id(&document, "change-bg-btn")?,
            modal: by_id(&document, "modal")?,
            close_modal: by_id(&document, "close-modal")?,
            modal_title: by_id(&document, "modal-title")?,
            modal_content: by_id(&document, "modal-content")?,
            edit,
            last: None,
            document,
        })
    }

    pub(crate) fn apply(&mut self, view: &PageView) -> Result<(), JsValue> {
        let last = self.last.take();

        self.document.set_title(&view.document_title);
        self.title.set_text_content(Some(&view.title));
        self.subtitle.set_text_content(Some(&view.subtitle));
        self.name.set_text_content(Some(&view.name));
        self.username.set_text_content(Some(&view.username));
        self.description.set_text_content(Some(&view.description));

        self.overlay
            .style()
            .set_property("background-color", &view.overlay_color)?;
        let opacity = view.text_opacity.to_string();
        let marked = self.document.query_selector_all(".text-opacity")?;
        for i in 0..marked.length() {
            if let Some(el) = marked.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                el.style().set_property("opacity", &opacity)?;
            }
        }

        if last.as_ref().is_none_or(|l| l.buttons != view.buttons) {
            self.buttons.set_inner_html("");
            for (index, button) in view.buttons.iter().enumerate() {
                let el = self.button_element(index, button)?;
                self.buttons.append_child(&el)?;
            }
        }

        if last.as_ref().is_none_or(|l| l.social_links != view.social_links) {
            self.social_links.set_inner_html("");
            for link in &view.social_links {
                let el = self.social_link_element(link)?;
                self.social_links.append_child(&el)?;
            }
        }

        let bg = &view.background;
        let style = self.background.style();
        match &bg.image_css {
            Some(css) => style.set_property("background-image", css)?,
            None => {
                style.remove_property("background-image")?;
            }
        }
        style.set_property("opacity", &bg.opacity.to_string())?;
        self.image_info.set_text_content(Some(&bg.info_text));
        self.change_background.set_disabled(!bg.retry_enabled);

        if last.as_ref().is_none_or(|l| l.modal != view.modal) {
            self.modal_title.set_text_content(Some(&view.modal.title));
            self.modal_content.set_inner_html(&view.modal.content);
            self.modal
                .class_list()
                .toggle_with_force("hidden", !view.modal.visible)?;
        }

        self.apply_edit_dialog(view.edit_dialog.as_ref())?;

        self.last = Some(view.clone());
        Ok(())
    }

    fn button_element(&self, index: usize, button: &ButtonView) -> Result<Element, JsValue> {
        let tag = match button.action {
            ButtonAction::Navigate { .. } => "a",
            ButtonAction::OpenModal { .. } => "button",
        };
        let el = self.document.create_element(tag)?;
        el.set_class_name(BUTTON_CLASS);
        el.set_id(&button.element_id);
        el.set_attribute(BUTTON_INDEX_ATTR, &index.to_string())?;
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.style()
                .set_property("border-color", &button.border_color)?;
        }
        match &button.action {
            ButtonAction::Navigate { url, target } => {
                el.set_attribute("href", url)?;
                if let Some(target) = target {
                    el.set_attribute("target", target)?;
                }
            }
            ButtonAction::OpenModal { .. } => el.set_attribute("type", "button")?,
        }

        let icon = self.document.create_element("i")?;
        icon.set_class_name(&button.icon_class);
        el.append_child(&icon)?;
        let label = self.document.create_text_node(&button.text);
        el.append_child(&label)?;
        Ok(el)
    }

    fn social_link_element(&self, link: &SocialLinkView) -> Result<Element, JsValue> {
        let el = self.document.create_element("a")?;
        el.set_attribute("href", &link.url)?;
        el.set_attribute("target", "_blank")?;
        el.set_class_name(&link.class);
        let icon = self.document.create_element("i")?;
        icon.set_class_name(&link.icon_class);
        el.append_child(&icon)?;
        Ok(el)
    }

    fn apply_edit_dialog(&self, view: Option<&EditDialogView>) -> Result<(), JsValue> {
        let edit = &self.edit;
        let Some(view) = view else {
            if edit.dialog.open() {
                edit.dialog.close();
            }
            return Ok(());
        };

        edit.prompt.set_text_content(Some(&view.prompt));
        edit.input.set_hidden(view.multiline);
        edit.textarea.set_hidden(!view.multiline);
        // Only write the draft back when it differs, so typing keeps the caret.
        if view.multiline {
            if edit.textarea.value() != view.draft {
                edit.textarea.set_value(&view.draft);
            }
        } else if edit.input.value() != view.draft {
            edit.input.set_value(&view.draft);
        }

        if !edit.dialog.open() {
            edit.dialog.show_modal()?;
            if view.multiline {
                edit.textarea.focus()?;
            } else {
                edit.input.focus()?;
            }
        }
        Ok(())
    }
}

fn build_edit_dialog(document: &Document) -> Result<EditDialogElements, BindError> {
    let dialog: HtmlDialogElement = create(document, "dialog")?;
    dialog.set_id("edit-dialog");
    let prompt: HtmlElement = create(document, "p")?;
    let input: HtmlInputElement = create(document, "input")?;
    input.set_type("text");
    let textarea: HtmlTextAreaElement = create(document, "textarea")?;
    textarea.set_rows(5);
    let confirm: HtmlButtonElement = create(document, "button")?;
    confirm.set_text_content(Some("确定"));
    let cancel: HtmlButtonElement = create(document, "button")?;
    cancel.set_text_content(Some("取消"));

    let children: [&Node; 5] = [&prompt, &input, &textarea, &cancel, &confirm];
    for child in children {
        dialog.append_child(child).map_err(BindError::Create)?;
    }

    let body = document.body().ok_or(BindError::NoDocument)?;
    body.append_child(&dialog).map_err(BindError::Create)?;

    Ok(EditDialogElements {
        dialog,
        prompt,
        input,
        textarea,
        confirm,
        cancel,
    })
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Send `message` on every `event` fired at `target`.
fn on(
    app: &Rc<App>,
    target: &EventTarget,
    event: &str,
    message: impl Fn() -> Message + 'static,
) -> Result<(), JsValue> {
    let app = Rc::clone(app);
    listen(target, event, move |_| app.dispatch(message()))
}

pub(crate) fn wire(app: &Rc<App>) -> Result<(), JsValue> {
    let mounts = app.mounts.borrow();

    on(app, &mounts.change_background, "click", || {
        Message::BackgroundRequested
    })?;
    on(app, &mounts.close_modal, "click", || {
        Message::ModalClicked(ClickTarget::CloseButton)
    })?;
    on(app, &mounts.title, "click", || {
        Message::EditRequested(EditableField::Title)
    })?;
    on(app, &mounts.subtitle, "click", || {
        Message::EditRequested(EditableField::Subtitle)
    })?;
    on(app, &mounts.description, "click", || {
        Message::EditRequested(EditableField::Description)
    })?;

    {
        let app_ = Rc::clone(app);
        let modal = mounts.modal.clone();
        listen(&mounts.modal, "click", move |event| {
            let on_scrim = event.target().is_some_and(|t| {
                let t: &JsValue = t.as_ref();
                let m: &JsValue = modal.as_ref();
                t == m
            });
            if on_scrim {
                app_.dispatch(Message::ModalClicked(ClickTarget::Scrim));
            } else {
                app_.dispatch(Message::ModalClicked(ClickTarget::Content));
            }
        })?;
    }

    {
        let app_ = Rc::clone(app);
        listen(&mounts.buttons, "click", move |event| {
            let index = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("[{BUTTON_INDEX_ATTR}]")).ok().flatten())
                .and_then(|el| el.get_attribute(BUTTON_INDEX_ATTR))
                .and_then(|s| s.parse::<usize>().ok());
            if let Some(index) = index {
                app_.dispatch(Message::ButtonPressed(index));
            }
        })?;
    }

    let edit = &mounts.edit;
    {
        let app_ = Rc::clone(app);
        let input = edit.input.clone();
        listen(&edit.input, "input", move |_| {
            app_.dispatch(Message::EditDraftChanged(input.value()))
        })?;
    }
    {
        let app_ = Rc::clone(app);
        let textarea = edit.textarea.clone();
        listen(&edit.textarea, "input", move |_| {
            app_.dispatch(Message::EditDraftChanged(textarea.value()))
        })?;
    }
    {
        let app_ = Rc::clone(app);
        listen(&edit.input, "keydown", move |event| {
            if event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|k| k.key() == "Enter")
            {
                event.prevent_default();
                app_.dispatch(Message::EditConfirmed);
            }
        })?;
    }
    on(app, &edit.confirm, "click", || Message::EditConfirmed)?;
    on(app, &edit.cancel, "click", || Message::EditCancelled)?;
    // Escape key.
    on(app, &edit.dialog, "cancel", || Message::EditCancelled)?;

    Ok(())
}

/// Show the startup error banner and remove it after its duration.
pub(crate) fn show_error(notice: &ErrorNotice) {
    let Ok(document) = document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Ok(banner) = document.create_element("div") else {
        return;
    };
    banner.set_class_name(ERROR_BANNER_CLASS);
    banner.set_text_content(Some(&notice.message));
    if body.append_child(&banner).is_err() {
        return;
    }

    let millis = u32::try_from(notice.duration.as_millis()).unwrap_or(u32::MAX);
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(millis).await;
        banner.remove();
    });
}
