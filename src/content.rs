//! Which title, subtitle and description the page shows.

use rand::Rng;

use crate::{
    cfg::{PreferenceKey, PreferenceStore, Preferences},
    site::Configuration,
};

/// The only part of the page a visitor can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteText {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

impl SiteText {
    /// Decide the texts for this page load.
    ///
    /// On the first visit a title/subtitle pair is drawn from the configured
    /// options and remembered; later visits reuse whatever was remembered,
    /// including values the visitor typed in.
    pub fn resolve<S: PreferenceStore>(
        config: &Configuration,
        prefs: &mut Preferences<S>,
        rng: &mut impl Rng,
    ) -> Self {
        let site = &config.site;
        let mut text = Self {
            title: site.title.clone(),
            subtitle: site.subtitle.clone(),
            description: site.description.clone(),
        };

        if prefs.is_title_selected() {
            if let Some(title) = prefs.get(PreferenceKey::SiteTitle) {
                text.title = title;
            }
            if let Some(subtitle) = prefs.get(PreferenceKey::SiteSubtitle) {
                text.subtitle = subtitle;
            }
        } else {
            let (title, subtitle) = draw_pair(&site.title_options, &site.subtitle_options, rng);
            if let Some(title) = title {
                text.title = title.to_owned();
            }
            if let Some(subtitle) = subtitle {
                text.subtitle = subtitle.to_owned();
            }
            tracing::debug!("first visit, picked {:?} / {:?}", text.title, text.subtitle);

            prefs.mark_title_selected();
            prefs.set(PreferenceKey::SiteTitle, &text.title);
            prefs.set(PreferenceKey::SiteSubtitle, &text.subtitle);
        }

        if let Some(description) = prefs.get(PreferenceKey::SiteDescription) {
            text.description = description;
        }

        text
    }
}

/// Lists of equal length are treated as pairs and share one index.
fn draw_pair<'a>(
    titles: &'a [String],
    subtitles: &'a [String],
    rng: &mut impl Rng,
) -> (Option<&'a str>, Option<&'a str>) {
    if !titles.is_empty() && titles.len() == subtitles.len() {
        let index = rng.gen_range(0..titles.len());
        return (Some(titles[index].as_str()), Some(subtitles[index].as_str()));
    }
    (pick(titles, rng), pick(subtitles, rng))
}

fn pick<'a>(options: &'a [String], rng: &mut impl Rng) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    Some(options[rng.gen_range(0..options.len())].as_str())
}

/// Convert a configured percentage into a CSS opacity.
pub fn opacity(percent: f64) -> f64 {
    percent / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cfg::MemoryStore, site::tests::sample};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_first_visit_draws_a_pair() {
        let config = sample();
        for seed in 0..32 {
            let mut prefs = Preferences::new(MemoryStore::default());
            let mut rng = StdRng::seed_from_u64(seed);
            let text = SiteText::resolve(&config, &mut prefs, &mut rng);

            let index = config
                .site
                .title_options
                .iter()
                .position(|t| *t == text.title)
                .expect("title should come from the options");
            assert_eq!(text.subtitle, config.site.subtitle_options[index]);

            assert!(prefs.is_title_selected());
            assert_eq!(prefs.get(PreferenceKey::SiteTitle), Some(text.title));
            assert_eq!(prefs.get(PreferenceKey::SiteSubtitle), Some(text.subtitle));
        }
    }

    #[test]
    fn test_return_visit_reuses_choice() {
        let config = sample();
        let mut prefs = Preferences::new(MemoryStore::default());
        let first = SiteText::resolve(&config, &mut prefs, &mut StdRng::seed_from_u64(1));

        for seed in 2..20 {
            let again = SiteText::resolve(&config, &mut prefs, &mut StdRng::seed_from_u64(seed));
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_persisted_overrides_win() {
        let config = sample();
        let mut prefs = Preferences::new(MemoryStore::default());
        prefs.mark_title_selected();
        prefs.set(PreferenceKey::SiteTitle, "Mine");
        prefs.set(PreferenceKey::SiteDescription, "Edited");

        let text = SiteText::resolve(&config, &mut prefs, &mut StdRng::seed_from_u64(0));
        assert_eq!(text.title, "Mine");
        assert_eq!(text.subtitle, config.site.subtitle);
        assert_eq!(text.description, "Edited");
    }

    #[test]
    fn test_empty_options_keep_literal() {
        let mut config = sample();
        config.site.title_options.clear();
        config.site.subtitle_options = vec!["only".into()];
        let mut prefs = Preferences::new(MemoryStore::default());

        let text = SiteText::resolve(&config, &mut prefs, &mut StdRng::seed_from_u64(0));
        assert_eq!(text.title, config.site.title);
        assert_eq!(text.subtitle, "only");
        assert_eq!(prefs.get(PreferenceKey::SiteTitle).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_opacity() {
        assert_eq!(opacity(40.0), 0.4);
        assert_eq!(opacity(100.0), 1.0);
    }
}
