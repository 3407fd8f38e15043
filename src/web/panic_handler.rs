use std::panic::PanicHookInfo;

use wasm_bindgen::JsValue;

enum ReportError {
    NoWindow,
    NoDocument,
    NoBody,
    Attach(JsValue),
    Create(JsValue),
}

impl ReportError {
    fn describe(&self) -> &'static str {
        match self {
            Self::NoWindow => "no global window",
            Self::NoDocument => "no document",
            Self::NoBody => "no document body",
            Self::Attach(_) => "could not attach the report dialog",
            Self::Create(_) => "could not create the report dialog",
        }
    }
}

pub(crate) fn init_panic_handler() {
    std::panic::set_hook(Box::new(handle_panic));
}

#[cold]
fn handle_panic(info: &PanicHookInfo<'_>) {
    let message = panic_message(info);

    if let Err(e) = show_report(&message) {
        let summary = JsValue::from_str(&format!(
            "failed to display panic info in page: {}",
            e.describe()
        ));
        match e {
            ReportError::Attach(v) | ReportError::Create(v) => {
                web_sys::console::error_2(&summary, &v)
            }
            _ => web_sys::console::error_1(&summary),
        }
    }

    web_sys::console::error_1(&JsValue::from_str(&message));
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let location = match info.location() {
        Some(l) => format!("{}:{}:{}", l.file(), l.line(), l.column()),
        None => String::from("?"),
    };

    let payload = info.payload();
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        ""
    };

    if detail.is_empty() {
        format!("panicked at {location}")
    } else {
        format!("panicked at {location}:\n{detail}")
    }
}

fn show_report(message: &str) -> Result<(), ReportError> {
    let window = web_sys::window().ok_or(ReportError::NoWindow)?;
    let document = window
        .document()
        .ok_or(ReportError::NoDocument)?;

    let dialog = document
        .create_element("dialog")
        .map_err(ReportError::Create)?;

    let _ = dialog.set_attribute("open", "true");

    let body = document.body().ok_or(ReportError::NoBody)?;

    body.append_child(&dialog)
        .map_err(ReportError::Attach)?;

    // Best effort from here on.
    if let Ok(h1) = document.create_element("h1") {
        h1.set_text_content(Some("Something went wrong"));
        let _ = dialog.append_child(&h1);
    }

    if let Ok(p) = document.create_element("p") {
        p.set_text_content(Some(
            "The page hit an unexpected error and stopped responding. \
            Reloading usually helps. Opening the console may reveal additional details.",
        ));
        let _ = dialog.append_child(&p);
    }

    match document.create_element("pre") {
        Ok(pre) => {
            pre.set_text_content(Some(message));
            let _ = dialog.append_child(&pre);
        }
        Err(_) => dialog.set_text_content(Some(message)),
    }

    if let Ok(button) = document.create_element("button") {
        button.set_text_content(Some("Dismiss"));
        if button
            .set_attribute("onclick", "this.parentElement.close()")
            .is_ok()
        {
            let _ = dialog.append_child(&button);
        }
    }

    Ok(())
}
