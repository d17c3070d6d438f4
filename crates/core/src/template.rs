//! Placeholder substitution for view templates
//!
//! Templates are plain strings with `#name#` tokens. Substitution is a single
//! left-to-right pass, so text inserted for one token is never scanned again
//! (a post whose text contains `#likes#` renders that text literally).
//! Tokens without a replacement are left verbatim.

/// Substitute every known `#token#` in `template`.
///
/// `replacements` pairs full tokens (including both `#`) with their values.
/// When several tokens match at the same position the first one listed wins.
pub fn render_template(template: &str, replacements: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(pos) = rest.find('#') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        for (token, value) in replacements {
            if !token.is_empty() && tail.starts_with(token) {
                out.push_str(value);
                rest = &tail[token.len()..];
                continue 'scan;
            }
        }

        out.push('#');
        rest = &tail[1..];
    }

    out.push_str(rest);
    out
}
