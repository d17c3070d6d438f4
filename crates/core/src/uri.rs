//! URL derivation for AT URIs
//!
//! Each record kind has its own URI grammar
//! (`at://did:plc:<id>/<collection>/<rkey>`) and its own public path on the
//! web client. Public URLs need a well-formed URI; API URLs only URL-encode
//! the identifier against a fixed endpoint and never fail.

use crate::error::CoreError;
use regex::Regex;
use std::sync::LazyLock;

/// Public web client base.
pub const PUBLIC_WEB_BASE: &str = "https://bsky.app";

/// Public, unauthenticated XRPC base used for follow-up API URLs.
pub const PUBLIC_API_BASE: &str = "https://public.api.bsky.app/xrpc";

static RECORD_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^at://(did:plc:[A-Za-z0-9]+)/([A-Za-z0-9.]+)/([A-Za-z0-9]+)$").unwrap()
});

static PROFILE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:at://)?(did:plc:[A-Za-z0-9]+)(?:/app\.bsky\.actor\.profile/self)?$").unwrap()
});

/// Kind of record an AT URI points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Post,
    List,
    StarterPack,
    Profile,
}

impl RecordKind {
    /// Collection NSID of the record kind.
    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::Post => "app.bsky.feed.post",
            RecordKind::List => "app.bsky.graph.list",
            RecordKind::StarterPack => "app.bsky.graph.starterpack",
            RecordKind::Profile => "app.bsky.actor.profile",
        }
    }

    /// Whether a URI with `collection` addresses this kind. Starter packs are
    /// also referenced through their lookup method's NSID.
    pub fn accepts(self, collection: &str) -> bool {
        collection == self.collection()
            || (self == RecordKind::StarterPack && collection == "app.bsky.graph.getStarterPacks")
    }

    /// XRPC method and query parameter used to look the record up.
    fn api_lookup(self) -> (&'static str, &'static str) {
        match self {
            RecordKind::Post => ("app.bsky.feed.getPosts", "uris"),
            RecordKind::List => ("app.bsky.graph.getList", "list"),
            RecordKind::StarterPack => ("app.bsky.graph.getStarterPacks", "uris"),
            RecordKind::Profile => ("app.bsky.actor.getProfile", "actor"),
        }
    }
}

/// Parsed components of a record AT URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtUri {
    /// Repository DID, e.g. `did:plc:abc123`.
    pub did: String,
    pub collection: String,
    /// Record key, the last path segment.
    pub rkey: String,
}

/// Parse `uri` against the grammar of `kind`.
pub fn parse_at_uri(uri: &str, kind: RecordKind) -> Result<AtUri, CoreError> {
    let caps = RECORD_URI
        .captures(uri)
        .ok_or_else(|| CoreError::InvalidUri(uri.to_string()))?;

    if !kind.accepts(&caps[2]) {
        return Err(CoreError::InvalidUri(uri.to_string()));
    }

    Ok(AtUri {
        did: caps[1].to_string(),
        collection: caps[2].to_string(),
        rkey: caps[3].to_string(),
    })
}

/// Extract the DID from a profile identifier.
///
/// Accepts `did:plc:<id>`, `at://did:plc:<id>` and the profile record URI
/// `at://did:plc:<id>/app.bsky.actor.profile/self`.
pub fn parse_profile_did(uri: &str) -> Result<String, CoreError> {
    PROFILE_ID
        .captures(uri)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| CoreError::InvalidUri(uri.to_string()))
}

fn actor_segment<'a>(handle: Option<&'a str>, did: &'a str) -> &'a str {
    handle.filter(|h| !h.trim().is_empty()).unwrap_or(did)
}

/// Derive the public web URL of a record.
///
/// The handle replaces the DID segment when one is available.
pub fn public_url(kind: RecordKind, uri: &str, handle: Option<&str>) -> Result<String, CoreError> {
    let record = |kind: RecordKind| parse_at_uri(uri, kind).map(|parsed| {
        let actor = actor_segment(handle, &parsed.did).to_string();
        (actor, parsed.rkey)
    });

    Ok(match kind {
        RecordKind::Profile => {
            let did = parse_profile_did(uri)?;
            format!("{PUBLIC_WEB_BASE}/profile/{}", actor_segment(handle, &did))
        }
        RecordKind::Post => {
            let (actor, rkey) = record(kind)?;
            format!("{PUBLIC_WEB_BASE}/profile/{actor}/post/{rkey}")
        }
        RecordKind::List => {
            let (actor, rkey) = record(kind)?;
            format!("{PUBLIC_WEB_BASE}/profile/{actor}/lists/{rkey}")
        }
        RecordKind::StarterPack => {
            let (actor, rkey) = record(kind)?;
            format!("{PUBLIC_WEB_BASE}/starter-pack/{actor}/{rkey}")
        }
    })
}

/// Derive the public XRPC URL that fetches a record.
///
/// Profiles are looked up by DID when one can be extracted, otherwise the
/// identifier (usually a handle) is passed through as-is.
pub fn api_url(kind: RecordKind, uri: &str) -> String {
    let (method, param) = kind.api_lookup();
    let value = match kind {
        RecordKind::Profile => parse_profile_did(uri).unwrap_or_else(|_| uri.to_string()),
        _ => uri.to_string(),
    };
    format!(
        "{PUBLIC_API_BASE}/{method}?{param}={}",
        urlencoding::encode(&value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_URI: &str = "at://did:plc:abc123/app.bsky.feed.post/3kxyz789";

    #[test]
    fn test_parse_post_uri() {
        let parsed = parse_at_uri(POST_URI, RecordKind::Post).unwrap();
        assert_eq!(parsed.did, "did:plc:abc123");
        assert_eq!(parsed.collection, "app.bsky.feed.post");
        assert_eq!(parsed.rkey, "3kxyz789");
    }

    #[test]
    fn test_post_public_url_with_handle() {
        let url = public_url(RecordKind::Post, POST_URI, Some("alice.bsky.social")).unwrap();
        assert_eq!(url, "https://bsky.app/profile/alice.bsky.social/post/3kxyz789");
    }

    #[test]
    fn test_post_public_url_without_handle_uses_did() {
        let url = public_url(RecordKind::Post, POST_URI, None).unwrap();
        assert_eq!(url, "https://bsky.app/profile/did:plc:abc123/post/3kxyz789");

        let url = public_url(RecordKind::Post, POST_URI, Some("  ")).unwrap();
        assert_eq!(url, "https://bsky.app/profile/did:plc:abc123/post/3kxyz789");
    }

    #[test]
    fn test_post_public_url_ends_with_post_id() {
        for rkey in ["a", "3l2k4j5h6g", "ZZZ999"] {
            let uri = format!("at://did:plc:xyz/app.bsky.feed.post/{rkey}");
            let url = public_url(RecordKind::Post, &uri, Some("bob.test")).unwrap();
            assert!(url.ends_with(&format!("/post/{rkey}")));
        }
    }

    #[test]
    fn test_malformed_uris_are_rejected() {
        let bad = [
            "",
            "https://bsky.app/profile/alice/post/1",
            "at://did:web:example.com/app.bsky.feed.post/1",
            "at://did:plc:abc/app.bsky.feed.post/",
            "at://did:plc:abc/app.bsky.feed.post/1/extra",
            "at://did:plc:a-b/app.bsky.feed.post/1",
        ];
        for uri in bad {
            let err = public_url(RecordKind::Post, uri, None).unwrap_err();
            assert_eq!(err, CoreError::InvalidUri(uri.to_string()));
        }
    }

    #[test]
    fn test_collection_must_match_kind() {
        let list_uri = "at://did:plc:abc/app.bsky.graph.list/3kabc";
        assert!(public_url(RecordKind::Post, list_uri, None).is_err());
        assert_eq!(
            public_url(RecordKind::List, list_uri, Some("carol.test")).unwrap(),
            "https://bsky.app/profile/carol.test/lists/3kabc"
        );
    }

    #[test]
    fn test_starter_pack_public_url() {
        let uri = "at://did:plc:abc/app.bsky.graph.starterpack/3ksp";
        assert_eq!(
            public_url(RecordKind::StarterPack, uri, Some("dave.test")).unwrap(),
            "https://bsky.app/starter-pack/dave.test/3ksp"
        );

        let lookup_uri = "at://did:plc:abc/app.bsky.graph.getStarterPacks/3ksp";
        assert_eq!(
            public_url(RecordKind::StarterPack, lookup_uri, None).unwrap(),
            "https://bsky.app/starter-pack/did:plc:abc/3ksp"
        );
        assert!(public_url(RecordKind::List, lookup_uri, None).is_err());
    }

    #[test]
    fn test_profile_public_url() {
        assert_eq!(
            public_url(RecordKind::Profile, "did:plc:abc", Some("erin.test")).unwrap(),
            "https://bsky.app/profile/erin.test"
        );
        assert_eq!(
            public_url(RecordKind::Profile, "at://did:plc:abc/app.bsky.actor.profile/self", None)
                .unwrap(),
            "https://bsky.app/profile/did:plc:abc"
        );
        assert!(public_url(RecordKind::Profile, "erin.test", None).is_err());
    }

    #[test]
    fn test_api_urls_encode_the_uri() {
        assert_eq!(
            api_url(RecordKind::Post, POST_URI),
            "https://public.api.bsky.app/xrpc/app.bsky.feed.getPosts?uris=at%3A%2F%2Fdid%3Aplc%3Aabc123%2Fapp.bsky.feed.post%2F3kxyz789"
        );
        assert_eq!(
            api_url(RecordKind::List, "at://did:plc:abc/app.bsky.graph.list/1"),
            "https://public.api.bsky.app/xrpc/app.bsky.graph.getList?list=at%3A%2F%2Fdid%3Aplc%3Aabc%2Fapp.bsky.graph.list%2F1"
        );
        assert_eq!(
            api_url(RecordKind::Profile, "did:plc:abc"),
            "https://public.api.bsky.app/xrpc/app.bsky.actor.getProfile?actor=did%3Aplc%3Aabc"
        );
        assert_eq!(
            api_url(RecordKind::Profile, "erin.test"),
            "https://public.api.bsky.app/xrpc/app.bsky.actor.getProfile?actor=erin.test"
        );
    }
}
