//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use url::Url;

/// Remove every whitespace character, as found in wrapped sequence bodies
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Build a DAS query URL: `{endpoint}?segment={segment}`
///
/// The segment is appended as a query pair so that accessions are escaped.
pub fn das_query_url(endpoint: &str, segment: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut().append_pair("segment", segment);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace("MKT AYI\nAKQ\tR"), "MKTAYIAKQR");
    }

    #[test]
    fn test_das_query_url() {
        let url = das_query_url("http://www.ebi.ac.uk/das-srv/uniprot/das/uniprot/features", "P12345")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://www.ebi.ac.uk/das-srv/uniprot/das/uniprot/features?segment=P12345"
        );
        assert!(das_query_url("not a url", "P1").is_err());
    }
}
