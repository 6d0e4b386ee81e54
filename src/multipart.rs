//! `multipart/form-data` encoding (RFC 7578).
//!
//! Every conversion request is a single multipart body: one text part per
//! option and fixed field, plus at most one file part for uploads.

/// An in-memory multipart form.
///
/// Parts are written in the order they are added. The boundary is random per
/// form, so it can't collide with content from a previous request.
pub(crate) struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
    parts: usize,
}

impl MultipartForm {
    pub(crate) fn new() -> Self {
        let boundary = format!("----html2pdf-client-{}", uuid::Uuid::new_v4().simple());
        log::trace!("Multipart boundary: {}", boundary);

        Self {
            boundary,
            body: Vec::new(),
            parts: 0,
        }
    }

    /// Append a text field.
    pub(crate) fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape(name)
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file part.
    pub(crate) fn file(
        &mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        content: &[u8],
    ) -> &mut Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                escape(name),
                escape(filename),
                content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Number of parts added so far.
    pub(crate) fn part_count(&self) -> usize {
        self.parts
    }

    /// Value of the request's `Content-Type` header.
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the form and return the encoded body.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }

    fn open_part(&mut self) {
        self.parts += 1;
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

/// Quoted-string escaping for `Content-Disposition` parameters.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
