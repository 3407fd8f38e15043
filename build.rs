fn warn(msg: &str) {
    println!(
        "cargo:warning={}",
        msg.replace('%', "%25").replace('\n', "%0A")
    );
}

fn main() {
    bundled_config::check();
}

/// Lints the configuration shipped in `www/` so a broken page is noticed at
/// build time instead of in a visitor's browser.
mod bundled_config {
    use std::{fs, path::Path};

    use serde_json::{Map, Value};

    use super::warn;

    const CONFIG_PATH_STR: &str = "www/config.json";

    const REQUIRED_SITE_KEYS: [&str; 6] = [
        "defaultTitle",
        "title",
        "subtitle",
        "name",
        "username",
        "description",
    ];
    const REQUIRED_STYLE_KEYS: [&str; 3] =
        ["overlayOpacity", "textOpacity", "buttonBorderOpacity"];

    pub(super) fn check() {
        println!("cargo:rerun-if-changed={CONFIG_PATH_STR}");

        let path = Path::new(CONFIG_PATH_STR);
        if !path.exists() {
            return;
        }

        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn(&format!("Failed to read {CONFIG_PATH_STR}: {e}"));
                return;
            }
        };

        let root = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn(&format!("{CONFIG_PATH_STR}: top level is not an object"));
                return;
            }
            Err(e) => {
                warn(&format!("{CONFIG_PATH_STR}:{}: {e}", e.line()));
                return;
            }
        };

        check_site(&root);
        check_styles(&root);
        check_buttons(&root);
        check_background(&root);
    }

    fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
        let section = root.get(key).and_then(Value::as_object);
        if section.is_none() {
            warn(&format!("{CONFIG_PATH_STR}: missing object `{key}`"));
        }
        section
    }

    fn check_site(root: &Map<String, Value>) {
        let Some(site) = section(root, "site") else {
            return;
        };

        for key in REQUIRED_SITE_KEYS {
            if !site.get(key).is_some_and(Value::is_string) {
                warn(&format!("{CONFIG_PATH_STR}: site.{key} should be a string"));
            }
        }

        let len = |key: &str| site.get(key).and_then(Value::as_array).map(Vec::len);
        if let (Some(titles), Some(subtitles)) = (len("titleOptions"), len("subtitleOptions"))
            && titles != subtitles
        {
            warn(&format!(
                "{CONFIG_PATH_STR}: {titles} title options but {subtitles} subtitle options; \
                they will be drawn independently instead of as pairs"
            ));
        }
    }

    fn check_styles(root: &Map<String, Value>) {
        let Some(styles) = section(root, "styles") else {
            return;
        };

        for key in REQUIRED_STYLE_KEYS {
            match styles.get(key).and_then(Value::as_f64) {
                Some(v) if (0.0..=100.0).contains(&v) => {}
                Some(v) => warn(&format!(
                    "{CONFIG_PATH_STR}: styles.{key} is {v}, expected a percentage in 0..=100"
                )),
                None => warn(&format!("{CONFIG_PATH_STR}: styles.{key} should be a number")),
            }
        }
    }

    fn check_buttons(root: &Map<String, Value>) {
        let Some(buttons) = root.get("buttons").and_then(Value::as_array) else {
            return;
        };

        for (index, button) in buttons.iter().enumerate() {
            let id = button
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("#{index}"));

            let needed: &[&str] = match button.get("type").and_then(Value::as_str) {
                Some("link") => &["url"],
                Some("action") => &["modalTitle", "modalContent"],
                Some(other) => {
                    warn(&format!(
                        "{CONFIG_PATH_STR}: button `{id}` has unknown type `{other}`"
                    ));
                    continue;
                }
                None => {
                    warn(&format!("{CONFIG_PATH_STR}: button `{id}` has no type"));
                    continue;
                }
            };

            for key in needed {
                if !button.get(*key).is_some_and(Value::is_string) {
                    warn(&format!(
                        "{CONFIG_PATH_STR}: button `{id}` is missing `{key}`"
                    ));
                }
            }
        }
    }

    fn check_background(root: &Map<String, Value>) {
        let Some(background) = section(root, "background") else {
            return;
        };

        match background.get("apiUrl").and_then(Value::as_str) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
            Some(url) => warn(&format!(
                "{CONFIG_PATH_STR}: background.apiUrl `{url}` is not an http(s) URL"
            )),
            None => warn(&format!("{CONFIG_PATH_STR}: background.apiUrl is missing")),
        }

        if !background
            .get("defaultBackground")
            .is_some_and(Value::is_string)
        {
            warn(&format!(
                "{CONFIG_PATH_STR}: background.defaultBackground is missing"
            ));
        }
    }
}
