// src/analyze/language.rs
//! Deterministic language detection (whatlang trigram model, no RNG).
//!
//! The detector is built once per process by [`init`]; calling it again is a
//! no-op. [`detect_language`] initializes lazily if nobody did.

use once_cell::sync::OnceCell;
use whatlang::{Detector, Lang};

/// ISO code for "undetermined".
pub const UNDETERMINED: &str = "und";

static DETECTOR: OnceCell<Detector> = OnceCell::new();

/// One-time, idempotent classifier setup.
pub fn init() -> &'static Detector {
    DETECTOR.get_or_init(Detector::new)
}

/// ISO 639-1 code of the detector's best guess for `text`. `"und"` when the
/// text is blank, no script/language can be guessed, or the language has no
/// two-letter code. Low-confidence guesses are kept: short comments rarely
/// reach whatlang's reliability bar.
pub fn detect_language(text: &str) -> String {
    if text.trim().is_empty() {
        return UNDETERMINED.to_string();
    }
    init()
        .detect(text)
        .and_then(|info| iso_639_1(info.lang()))
        .unwrap_or(UNDETERMINED)
        .to_string()
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    use whatlang::Lang::*;
    let code = match lang {
        Eng => "en",
        Epo => "eo",
        Rus => "ru",
        Cmn => "zh",
        Spa => "es",
        Por => "pt",
        Ita => "it",
        Ben => "bn",
        Fra => "fr",
        Deu => "de",
        Ukr => "uk",
        Kat => "ka",
        Ara => "ar",
        Hin => "hi",
        Jpn => "ja",
        Heb => "he",
        Yid => "yi",
        Pol => "pl",
        Amh => "am",
        Jav => "jv",
        Kor => "ko",
        Nob => "no",
        Dan => "da",
        Swe => "sv",
        Fin => "fi",
        Tur => "tr",
        Nld => "nl",
        Hun => "hu",
        Ces => "cs",
        Ell => "el",
        Bul => "bg",
        Bel => "be",
        Mar => "mr",
        Kan => "kn",
        Ron => "ro",
        Slv => "sl",
        Hrv => "hr",
        Srp => "sr",
        Mkd => "mk",
        Lit => "lt",
        Lav => "lv",
        Est => "et",
        Tam => "ta",
        Vie => "vi",
        Urd => "ur",
        Tha => "th",
        Guj => "gu",
        Uzb => "uz",
        Pan => "pa",
        Aze => "az",
        Ind => "id",
        Tel => "te",
        Pes => "fa",
        Mal => "ml",
        Ori => "or",
        Mya => "my",
        Nep => "ne",
        Sin => "si",
        Khm => "km",
        Tuk => "tk",
        Aka => "ak",
        Zul => "zu",
        Sna => "sn",
        Afr => "af",
        Lat => "la",
        Slk => "sk",
        Cat => "ca",
        Tgl => "tl",
        Hye => "hy",
        _ => return None,
    };
    Some(code)
}
