//! Request body encoding
//!
//! URL-encoded and multipart serialization of form payloads, plus the
//! small header helpers the HTTP transport needs.

use std::time::{SystemTime, UNIX_EPOCH};

use ajaxify_dom::{FormData, FormDataValue};
use url::Url;
use url::form_urlencoded;

/// Default content type for non-multipart bodies
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Serialize the text entries as `application/x-www-form-urlencoded`.
///
/// File entries only travel in multipart bodies.
pub fn urlencode(data: &FormData) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in data.entries() {
        if let FormDataValue::Text(text) = value {
            serializer.append_pair(name, text);
        }
    }
    serializer.finish()
}

/// Serialize form entries as `multipart/form-data`.
///
/// Returns the content type (with boundary) and the body bytes.
pub fn multipart(data: &FormData) -> (String, Vec<u8>) {
    multipart_with_boundary(data, &format!("----AjaxifyBoundary{:x}", rand_boundary()))
}

pub(crate) fn multipart_with_boundary(data: &FormData, boundary: &str) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in data.entries() {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());

        match value {
            FormDataValue::Text(text) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape_quotes(name))
                        .as_bytes(),
                );
                body.extend_from_slice(text.as_bytes());
            }
            FormDataValue::File(file) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        escape_quotes(name),
                        escape_quotes(&file.name),
                        file.mime_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&file.content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

/// `Accept` header value for a `dataType`
pub fn accept_for(data_type: Option<&str>) -> &'static str {
    let Some(data_type) = data_type else {
        return "*/*";
    };
    match data_type.trim().to_ascii_lowercase().as_str() {
        "json" => "application/json, text/javascript, */*; q=0.01",
        "xml" => "application/xml, text/xml, */*; q=0.01",
        "html" => "text/html, */*; q=0.01",
        "text" => "text/plain, */*; q=0.01",
        "script" => "text/javascript, application/javascript, application/ecmascript, application/x-ecmascript, */*; q=0.01",
        _ => "*/*",
    }
}

/// Append an already-encoded query fragment to a URL
pub fn append_query(url: &mut Url, encoded: &str) {
    if encoded.is_empty() {
        return;
    }
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
        _ => encoded.to_string(),
    };
    url.set_query(Some(&query));
}

/// Append the `_=<millis>` cache-busting parameter
pub fn cache_bust(url: &mut Url) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    append_query(url, &format!("_={}", millis));
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

fn rand_boundary() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajaxify_dom::FileEntry;

    #[test]
    fn test_urlencode() {
        let data: FormData = [("name", "Fang xin"), ("tag", "a&b"), ("tag", "c")].into_iter().collect();
        assert_eq!(urlencode(&data), "name=Fang+xin&tag=a%26b&tag=c");
    }

    #[test]
    fn test_urlencode_skips_files() {
        let mut data = FormData::new();
        data.append("name", "Fangxin");
        data.append_file("upload", FileEntry::new("a.txt", "text/plain", b"hi".to_vec()));
        data.append("age", "22");
        assert_eq!(urlencode(&data), "name=Fangxin&age=22");
    }

    #[test]
    fn test_multipart_layout() {
        let mut data = FormData::new();
        data.append("name", "Fangxin");
        data.append_file("upload", FileEntry::new("a.txt", "text/plain", b"hi".to_vec()));

        let (content_type, body) = multipart_with_boundary(&data, "XYZ");
        assert_eq!(content_type, "multipart/form-data; boundary=XYZ");

        let body = String::from_utf8(body).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nFangxin\r\n\
             --XYZ\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhi\r\n--XYZ--\r\n"
        );
    }

    #[test]
    fn test_multipart_generates_boundary() {
        let (content_type, _) = multipart(&FormData::new());
        assert!(content_type.starts_with("multipart/form-data; boundary=----AjaxifyBoundary"));
    }

    #[test]
    fn test_accept_mapping() {
        assert!(accept_for(Some("json")).starts_with("application/json"));
        assert!(accept_for(Some("HTML")).starts_with("text/html"));
        assert_eq!(accept_for(Some("binary")), "*/*");
        assert_eq!(accept_for(None), "*/*");
    }

    #[test]
    fn test_append_query() {
        let mut url = Url::parse("https://example.com/x").unwrap();
        append_query(&mut url, "a=1");
        assert_eq!(url.as_str(), "https://example.com/x?a=1");
        append_query(&mut url, "b=2");
        assert_eq!(url.as_str(), "https://example.com/x?a=1&b=2");
        append_query(&mut url, "");
        assert_eq!(url.as_str(), "https://example.com/x?a=1&b=2");
    }

    #[test]
    fn test_cache_bust() {
        let mut url = Url::parse("https://example.com/x?a=1").unwrap();
        cache_bust(&mut url);
        let query = url.query().unwrap();
        assert!(query.starts_with("a=1&_="));
        assert!(query["a=1&_=".len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
