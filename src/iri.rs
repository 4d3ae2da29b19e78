//! Deterministic IRI minting and string sanitization.
//!
//! An instance IRI is `inst:<slug>_<hash8>` where the hash covers the
//! surface text, the character offset, and the node kind. Identical input
//! therefore always mints identical IRIs. Alternative readings derive their
//! IRI from the parent: `<parent>_alt_<reading>`.

use sha2::{Digest, Sha256};

/// Hash backend for IRI minting. SHA-256 is the default; the seam exists so
/// deployments with their own digest policy can swap it without touching
/// the minting scheme.
pub trait IriHasher {
    fn hash_hex(&self, input: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl IriHasher for Sha256Hasher {
    fn hash_hex(&self, input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

pub struct IriMinter {
    hasher: Box<dyn IriHasher + Send + Sync>,
}

impl std::fmt::Debug for IriMinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IriMinter").finish()
    }
}

impl Default for IriMinter {
    fn default() -> Self {
        Self::new()
    }
}

impl IriMinter {
    pub fn new() -> Self {
        Self {
            hasher: Box::new(Sha256Hasher),
        }
    }

    pub fn with_hasher(hasher: Box<dyn IriHasher + Send + Sync>) -> Self {
        Self { hasher }
    }

    /// Mint `inst:<slug>_<hash8>` for a node. `kind` separates the IRI
    /// spaces of mentions, real-world counterparts, roles, and assertions
    /// that share a label and offset.
    pub fn mint(&self, label: &str, span_offset: usize, kind: &str) -> String {
        let input = format!("{}|{}|{}", label, span_offset, kind);
        let hash = self.hasher.hash_hex(&input);
        format!("inst:{}_{}", slugify(label), &hash[..8])
    }

    /// IRI of an alternative reading, derived from its parent node.
    pub fn mint_alternative(parent_iri: &str, reading_tag: &str) -> String {
        format!("{}_alt_{}", parent_iri, slugify(reading_tag))
    }
}

/// Lowercased label with every non-alphanumeric run collapsed to `_`.
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_sep = true;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push('x');
    }
    out
}

/// Escape angle brackets, quotes, and ampersands in any string written to
/// the graph, so serialized output cannot smuggle markup.
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
