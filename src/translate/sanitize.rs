//! Resource-name sanitization shared by entities, intents and parameters.

use deunicode::deunicode;

/// Prefix Voiceflow puts on its builtin intent names (`VF.YES`, `VF.HELP`).
const BUILTIN_INTENT_PREFIX: &str = "VF.";

/// Make a display name safe for use as a Dialogflow resource name.
///
/// Transliterates to ASCII, turns whitespace into `_` and drops everything
/// outside `[A-Za-z0-9_-]`. The result is stable under re-application but
/// distinct inputs may collide (`"a b"` and `"a_b"`).
pub fn sanitize_resource_name(name: &str) -> String {
    let ascii = transliterate(name);
    let mut out = String::with_capacity(ascii.len());
    for ch in ascii.trim().chars() {
        if ch.is_whitespace() {
            out.push('_');
        } else if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
        }
    }
    out
}

/// Strip the builtin prefix from a Voiceflow intent name.
pub fn clean_display_name(name: &str) -> &str {
    name.strip_prefix(BUILTIN_INTENT_PREFIX).unwrap_or(name)
}

/// Romanize to ASCII: accents are dropped, other scripts are transcribed
/// (`Москва` → `Moskva`, `日本` → `Ri Ben`).
pub fn transliterate(input: &str) -> String {
    deunicode(input)
}
