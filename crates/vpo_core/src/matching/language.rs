//! ISO 639 language code normalization.
//!
//! Containers and probes report languages in mixed forms ("en", "eng",
//! "deu", "ger"). Everything the engine compares goes through
//! [`normalize_language`] first, which settles on ISO 639-2/B, the form MKV
//! and FFmpeg write.

/// Codes that carry meaning but name no language.
const SPECIAL_CODES: &[&str] = &["und", "mis", "mul", "zxx"];

/// ISO 639-1 to ISO 639-2/B, sorted by key.
const ISO_639_1_TO_639_2B: &[(&str, &str)] = &[
    ("aa", "aar"), ("ab", "abk"), ("af", "afr"), ("am", "amh"), ("ar", "ara"), ("as", "asm"),
    ("ay", "aym"), ("az", "aze"), ("ba", "bak"), ("be", "bel"), ("bg", "bul"), ("bh", "bih"),
    ("bi", "bis"), ("bn", "ben"), ("bo", "tib"), ("br", "bre"), ("ca", "cat"), ("co", "cos"),
    ("cs", "cze"), ("cy", "wel"), ("da", "dan"), ("de", "ger"), ("dz", "dzo"), ("el", "gre"),
    ("en", "eng"), ("eo", "epo"), ("es", "spa"), ("et", "est"), ("eu", "baq"), ("fa", "per"),
    ("fi", "fin"), ("fj", "fij"), ("fo", "fao"), ("fr", "fre"), ("fy", "fry"), ("ga", "gle"),
    ("gd", "gla"), ("gl", "glg"), ("gn", "grn"), ("gu", "guj"), ("ha", "hau"), ("he", "heb"),
    ("hi", "hin"), ("hr", "hrv"), ("hu", "hun"), ("hy", "arm"), ("ia", "ina"), ("id", "ind"),
    ("ie", "ile"), ("ik", "ipk"), ("is", "ice"), ("it", "ita"), ("iu", "iku"), ("ja", "jpn"),
    ("jv", "jav"), ("ka", "geo"), ("kk", "kaz"), ("kl", "kal"), ("km", "khm"), ("kn", "kan"),
    ("ko", "kor"), ("ks", "kas"), ("ku", "kur"), ("ky", "kir"), ("la", "lat"), ("ln", "lin"),
    ("lo", "lao"), ("lt", "lit"), ("lv", "lav"), ("mg", "mlg"), ("mi", "mao"), ("mk", "mac"),
    ("ml", "mal"), ("mn", "mon"), ("mr", "mar"), ("ms", "may"), ("mt", "mlt"), ("my", "bur"),
    ("na", "nau"), ("ne", "nep"), ("nl", "dut"), ("no", "nor"), ("oc", "oci"), ("om", "orm"),
    ("or", "ori"), ("pa", "pan"), ("pl", "pol"), ("ps", "pus"), ("pt", "por"), ("qu", "que"),
    ("rm", "roh"), ("rn", "run"), ("ro", "rum"), ("ru", "rus"), ("rw", "kin"), ("sa", "san"),
    ("sd", "snd"), ("se", "sme"), ("sg", "sag"), ("si", "sin"), ("sk", "slo"), ("sl", "slv"),
    ("sm", "smo"), ("sn", "sna"), ("so", "som"), ("sq", "alb"), ("sr", "srp"), ("ss", "ssw"),
    ("st", "sot"), ("su", "sun"), ("sv", "swe"), ("sw", "swa"), ("ta", "tam"), ("te", "tel"),
    ("tg", "tgk"), ("th", "tha"), ("ti", "tir"), ("tk", "tuk"), ("tl", "tgl"), ("tn", "tsn"),
    ("to", "ton"), ("tr", "tur"), ("ts", "tso"), ("tt", "tat"), ("tw", "twi"), ("ug", "uig"),
    ("uk", "ukr"), ("ur", "urd"), ("uz", "uzb"), ("vi", "vie"), ("vo", "vol"), ("wo", "wol"),
    ("xh", "xho"), ("yi", "yid"), ("yo", "yor"), ("za", "zha"), ("zh", "chi"), ("zu", "zul"),
];

/// ISO 639-2/T to ISO 639-2/B where the two differ, sorted by key.
const ISO_639_2T_TO_639_2B: &[(&str, &str)] = &[
    ("bod", "tib"), ("ces", "cze"), ("cym", "wel"), ("deu", "ger"), ("ell", "gre"),
    ("eus", "baq"), ("fas", "per"), ("fra", "fre"), ("hye", "arm"), ("isl", "ice"),
    ("kat", "geo"), ("mkd", "mac"), ("mri", "mao"), ("msa", "may"), ("mya", "bur"),
    ("nld", "dut"), ("ron", "rum"), ("slk", "slo"), ("sqi", "alb"), ("zho", "chi"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .binary_search_by(|(k, _)| (*k).cmp(key))
        .ok()
        .map(|i| table[i].1)
}

/// Normalize a language code to ISO 639-2/B.
///
/// - `None` or empty → `"und"`
/// - 2-letter codes map through ISO 639-1; unknown ones become `"und"`
/// - 3-letter terminological codes map to their bibliographic form
/// - other 3-letter codes are kept as-is (lower-cased)
/// - anything else → `"und"`
pub fn normalize_language(code: Option<&str>) -> String {
    let code = match code {
        Some(c) => c.trim().to_lowercase(),
        None => return "und".to_string(),
    };
    if code.is_empty() {
        return "und".to_string();
    }
    if SPECIAL_CODES.contains(&code.as_str()) {
        return code;
    }

    match code.chars().count() {
        2 => lookup(ISO_639_1_TO_639_2B, &code)
            .unwrap_or("und")
            .to_string(),
        3 => lookup(ISO_639_2T_TO_639_2B, &code)
            .map(str::to_string)
            .unwrap_or(code),
        _ => "und".to_string(),
    }
}

/// True when both codes name the same language after normalization.
pub fn languages_match(a: &str, b: &str) -> bool {
    normalize_language(Some(a)) == normalize_language(Some(b))
}

/// True when `code` matches any language in `candidates`.
pub fn language_in(code: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|c| languages_match(code, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_for_binary_search() {
        assert!(ISO_639_1_TO_639_2B.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(ISO_639_2T_TO_639_2B.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn two_letter_codes_map_to_bibliographic() {
        assert_eq!(normalize_language(Some("en")), "eng");
        assert_eq!(normalize_language(Some("de")), "ger");
        assert_eq!(normalize_language(Some("ZH")), "chi");
        assert_eq!(normalize_language(Some("xx")), "und");
    }

    #[test]
    fn terminological_codes_map_to_bibliographic() {
        assert_eq!(normalize_language(Some("deu")), "ger");
        assert_eq!(normalize_language(Some("fra")), "fre");
        assert_eq!(normalize_language(Some("jpn")), "jpn");
        assert_eq!(normalize_language(Some("qaa")), "qaa");
    }

    #[test]
    fn missing_and_odd_codes_are_undetermined() {
        assert_eq!(normalize_language(None), "und");
        assert_eq!(normalize_language(Some("  ")), "und");
        assert_eq!(normalize_language(Some("english")), "und");
        assert_eq!(normalize_language(Some("zxx")), "zxx");
    }

    #[test]
    fn languages_match_across_forms() {
        assert!(languages_match("de", "ger"));
        assert!(languages_match("deu", "GER"));
        assert!(!languages_match("eng", "jpn"));
        assert!(language_in("fr", &["eng".into(), "fre".into()]));
    }
}
