//! IRI minting for mapped instances.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use uuid::Uuid;

use super::term::Iri;

/// Characters that need percent-encoding in IRI path segments.
/// We keep alphanumeric, -, _, ., ~ as unreserved per RFC 3987.
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Generates instance IRIs under a namespace.
///
/// A namespace ending in `/` or `#` is used as is; anything else gets a `/`
/// separator appended.
pub struct IriMinter {
    base_uri: String,
}

impl IriMinter {
    pub fn new(base_uri: &str) -> Self {
        let base_uri = if base_uri.ends_with('/') || base_uri.ends_with('#') {
            base_uri.to_string()
        } else {
            format!("{base_uri}/")
        };
        Self { base_uri }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Escape a string for use in an IRI path segment.
    fn escape(value: &str) -> String {
        utf8_percent_encode(value, IRI_ENCODE_SET).to_string()
    }

    /// IRI for an instance of `class_name` identified by a natural key,
    /// e.g. the value of the identifier field.
    pub fn instance_iri(&self, class_name: &str, key: &str) -> Iri {
        Iri::new(format!(
            "{}{}/{}",
            self.base_uri,
            Self::escape(class_name),
            Self::escape(key)
        ))
    }

    /// IRI for an instance with no natural key.
    pub fn random_iri(&self, class_name: &str) -> Iri {
        self.instance_iri(class_name, &Uuid::new_v4().simple().to_string())
    }

    /// Fresh blank node label. The leading letter keeps stores that special
    /// case hexadecimal labels from renaming it.
    pub fn blank_node_id() -> String {
        format!("n{}", Uuid::new_v4().simple())
    }
}

/// The part of an IRI after its last `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(|c: char| c == '#' || c == '/')
        .next()
        .unwrap_or(iri)
}
