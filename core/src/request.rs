use std::mem;
use std::str::FromStr;

use crate::{Error, Result};
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, as it appears on the wire.
    pub path: String,
    /// Raw HTTP query without the leading `?`, empty if the request has none.
    pub query: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// Headers are moved out of `parts` and given back by [`SigningRequest::apply`].
    /// `parts` is left untouched if the uri can't be signed.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let mut req = Self::from_uri(parts.method.clone(), parts.uri.clone(), HeaderMap::new())?;

        // Take the headers out of the request to avoid copy.
        // We will return it back when apply the context.
        req.headers = mem::take(&mut parts.headers);
        Ok(req)
    }

    /// Build a signing context from method, uri and headers.
    pub fn from_uri(method: Method, uri: Uri, headers: HeaderMap) -> Result<Self> {
        let uri = uri.into_parts();
        let authority = uri
            .authority
            .ok_or_else(|| Error::url_invalid("request without authority is invalid for signing"))?;
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority,
            path: paq.path().to_string(),
            query: paq.query().unwrap_or_default().to_string(),
            headers,
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if self.query.is_empty() {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(self.query.len() + 1);
                    s.push('?');
                    s.push_str(&self.query);
                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Host and optional port of the request, without user info.
    pub fn host(&self) -> &str {
        let authority = self.authority.as_str();
        match authority.rsplit_once('@') {
            Some((_, host)) => host,
            None => authority,
        }
    }
}
