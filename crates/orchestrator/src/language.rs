//! Target language for generated replies.

use tracing::{info, warn};
use whatlang::Lang;

use crate::settings::Personality;

fn language_name(lang: Lang) -> Option<&'static str> {
    match lang {
        Lang::Eng => Some("English"),
        Lang::Spa => Some("Spanish"),
        Lang::Fra => Some("French"),
        Lang::Deu => Some("German"),
        Lang::Ita => Some("Italian"),
        Lang::Por => Some("Portuguese"),
        Lang::Nld => Some("Dutch"),
        Lang::Rus => Some("Russian"),
        Lang::Cmn => Some("Chinese"),
        Lang::Jpn => Some("Japanese"),
        _ => None,
    }
}

/// Language name detected in `text`, if it is one of the supported ones.
pub fn detect_language(text: &str) -> Option<&'static str> {
    whatlang::detect(text).and_then(|info| language_name(info.lang()))
}

/// Language to write in: detected from `source_text` when autodetect is on,
/// otherwise the configured language.
pub fn target_language(personality: &Personality, source_text: &str) -> String {
    if !personality.autodetect_language {
        return personality.language.clone();
    }

    match detect_language(source_text) {
        Some(name) => {
            info!("Detected {} for source text, replying in {}", name, name);
            name.to_string()
        }
        None => {
            warn!(
                "Language detection inconclusive, using '{}'",
                personality.language
            );
            personality.language.clone()
        }
    }
}
