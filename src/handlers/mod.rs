pub mod auth_handlers;
pub mod maintenance_handlers;
pub mod settings_handlers;
pub mod template_handlers;

/// Decode a URL-encoded string (form data): `+` → space, `%HH` → byte.
pub(crate) fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    let mut out = Vec::with_capacity(s.len());
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() {
        if b[i] == b'%' && i + 2 < b.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(b[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Parse URL-encoded form body into key-value pairs. Repeated keys are kept,
/// in order — the reorder endpoint relies on this.
pub(crate) fn parse_form_body(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            Some((url_decode(k), url_decode(v)))
        })
        .collect()
}

pub(crate) fn get_field<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// Map a `return` query code from a redirecting sibling endpoint onto its
/// banner message.
pub fn return_message(code: &str) -> Option<&'static str> {
    match code {
        "success0" => Some("Your request was completed successfully."),
        "error0" => Some("Your request failed because you do not have access to this action."),
        "error1" => Some("Your request failed because your inputs were invalid."),
        "error2" => Some("Your request failed due to a database error."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_body_keeps_repeated_keys_in_order() {
        let params = parse_form_body("order=3&order=1&order=2&section_type=body");
        let order: Vec<&str> = params
            .iter()
            .filter(|(k, _)| k == "order")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(order, vec!["3", "1", "2"]);
        assert_eq!(get_field(&params, "section_type"), "body");
    }

    #[test]
    fn url_decode_handles_space_and_percent() {
        assert_eq!(url_decode("End+of+Term"), "End of Term");
        assert_eq!(url_decode("a%26b%3Dc"), "a&b=c");
    }

    #[test]
    fn unknown_return_code_has_no_banner() {
        assert!(return_message("success0").is_some());
        assert!(return_message("warning9").is_none());
    }
}
