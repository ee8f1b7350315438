// src/registry/lookup.rs

use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{parse_entry, Document, Fetch, Lookup, RegistryError};
use crate::{archive::NetworkYear, config::ConfigError, Config};

/// Registry search/detail endpoints bound to a fetcher.
pub struct Registry<F> {
    fetcher: F,
    search: Url,
    host: Url,
}

impl<F: Fetch> Registry<F> {
    pub fn new(fetcher: F, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            search: config.search_url()?,
            host: config.host_url()?,
        })
    }

    fn search_url(&self, code: &str) -> Url {
        let mut url = self.search.clone();
        url.query_pairs_mut().append_pair("search", code);
        url
    }

    /// Find the registry entry for `pair.code` that covers `pair.year`.
    ///
    /// Links on the search page are tried in order; the first whose target
    /// contains the code and whose detail page accepts the year wins. Only
    /// transport failures are returned as errors.
    #[instrument(level = "info", skip(self), fields(code = %pair.code, year = %pair.year))]
    pub fn lookup(&self, pair: &NetworkYear) -> Result<Lookup, RegistryError> {
        let search = self.search_url(&pair.code);
        let body = match self.fetcher.get(&search) {
            Ok(body) => body,
            Err(e) if !e.is_fatal() => {
                warn!(error = %e, "search page unavailable");
                return Ok(Lookup::unmatched(pair));
            }
            Err(e) => return Err(e),
        };

        let results = Document::parse(&body);
        for href in results.links().into_iter().filter(|h| h.contains(pair.code.as_str())) {
            let detail = match self.host.join(href) {
                Ok(url) => url,
                Err(source) => {
                    warn!(href, error = %source, "skipping unresolvable link");
                    continue;
                }
            };
            debug!(url = %detail, "candidate detail page");

            let page = match self.fetcher.get(&detail) {
                Ok(page) => page,
                Err(e) if !e.is_fatal() => {
                    warn!(error = %e, "skipping candidate");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let entry = parse_entry(&page);
            if entry.accepts(&pair.year) {
                info!(name = %entry.name, doi = ?entry.doi, "matched");
                return Ok(Lookup::Matched(entry));
            }
            debug!(
                start = %entry.start_year,
                end = %entry.end_year,
                "operational years do not cover query year"
            );
        }

        info!("no matching registry entry");
        Ok(Lookup::unmatched(pair))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{cell::RefCell, collections::HashMap};

    /// Serves canned pages; unknown URLs answer 404, listed ones fail transport.
    #[derive(Default)]
    pub(crate) struct StubFetcher {
        pub pages: HashMap<String, String>,
        pub unreachable: Vec<String>,
        pub requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for StubFetcher {
        fn get(&self, url: &Url) -> Result<String, RegistryError> {
            let key = url.to_string();
            self.requested.borrow_mut().push(key.clone());
            if self.unreachable.contains(&key) {
                return Err(RegistryError::Transport {
                    url: key,
                    source: Box::new(std::io::Error::other("connection refused")),
                });
            }
            self.pages
                .get(&key)
                .cloned()
                .ok_or(RegistryError::Status {
                    url: key,
                    status: 404,
                })
        }
    }

    pub(crate) fn detail(code: &str, name: &str, start: &str, end: &str, doi: Option<&str>) -> String {
        let doi_row = doi
            .map(|d| {
                format!(
                    r#"<tr><th>Digital Object Identifier (DOI)</th><td><a href="{}">{}</a></td></tr>"#,
                    d, d
                )
            })
            .unwrap_or_default();
        format!(
            r#"<html><body>
               <table class="network-information">
                 <tr><th>FDSN code</th><td>{code}</td></tr>
                 <tr><th>Network name</th><td>{name}</td></tr>
                 <tr><th>Start year</th><td>{start}</td></tr>
                 <tr><th>End year</th><td>{end}</td></tr>
               </table>
               <table class="network-information">{doi_row}</table>
               </body></html>"#
        )
    }

    pub(crate) fn results(hrefs: &[&str]) -> String {
        let links: String = hrefs
            .iter()
            .map(|h| format!(r#"<a href="{}">{}</a>"#, h, h))
            .collect();
        format!("<html><body><a href=\"/\">home</a>{}</body></html>", links)
    }

    pub(crate) const SEARCH: &str = "https://www.fdsn.org/networks/?search=";

    fn registry(fetcher: StubFetcher) -> Registry<StubFetcher> {
        Registry::new(fetcher, &Config::default()).unwrap()
    }

    #[test]
    fn test_search_url_encodes_code() {
        let reg = registry(StubFetcher::default());
        assert_eq!(
            reg.search_url("TA").as_str(),
            "https://www.fdsn.org/networks/?search=TA"
        );
    }

    #[test]
    fn test_first_covering_candidate_wins() {
        let fetcher = StubFetcher::default()
            .page(
                &format!("{SEARCH}TA"),
                &results(&["/networks/detail/TA/", "/networks/detail/TA_2013/"]),
            )
            .page(
                "https://www.fdsn.org/networks/detail/TA/",
                &detail("TA", "USArray Transportable Array", "2003", "2008", None),
            )
            .page(
                "https://www.fdsn.org/networks/detail/TA_2013/",
                &detail(
                    "TA",
                    "Transportable Array 2013",
                    "2013",
                    "2021",
                    Some("https://doi.org/10.7914/SN/TA"),
                ),
            );
        let reg = registry(fetcher);

        let Lookup::Matched(entry) = reg.lookup(&NetworkYear::new("TA", "2015")).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(entry.name, "Transportable Array 2013");
        assert_eq!(entry.doi.as_deref(), Some("https://doi.org/10.7914/SN/TA"));

        let Lookup::Matched(entry) = reg.lookup(&NetworkYear::new("TA", "2005")).unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(entry.name, "USArray Transportable Array");
    }

    #[test]
    fn test_no_covering_entry_is_unmatched() {
        let fetcher = StubFetcher::default()
            .page(&format!("{SEARCH}XA"), &results(&["/networks/detail/XA_1990/"]))
            .page(
                "https://www.fdsn.org/networks/detail/XA_1990/",
                &detail("XA", "Temporary", "1990", "2005", None),
            );
        let reg = registry(fetcher);

        assert_eq!(
            reg.lookup(&NetworkYear::new("XA", "2010")).unwrap(),
            Lookup::Unmatched { code: "XA".to_string() }
        );
        assert!(matches!(
            reg.lookup(&NetworkYear::new("XA", "2000")).unwrap(),
            Lookup::Matched(_)
        ));
    }

    #[test]
    fn test_links_without_code_are_ignored() {
        let fetcher = StubFetcher::default()
            .page(&format!("{SEARCH}ZZ"), &results(&["/networks/detail/AA/"]));
        let reg = registry(fetcher);

        assert_eq!(
            reg.lookup(&NetworkYear::new("ZZ", "2010")).unwrap(),
            Lookup::Unmatched { code: "ZZ".to_string() }
        );
        assert_eq!(reg.fetcher.requested.borrow().len(), 1);
    }

    #[test]
    fn test_missing_detail_page_degrades() {
        let fetcher = StubFetcher::default()
            .page(
                &format!("{SEARCH}IU"),
                &results(&["/networks/detail/IU/", "/networks/detail/IU_mirror/"]),
            )
            .page(
                "https://www.fdsn.org/networks/detail/IU_mirror/",
                &detail("IU", "Global Seismograph Network", "1988", "", None),
            );
        let reg = registry(fetcher);

        assert!(matches!(
            reg.lookup(&NetworkYear::new("IU", "2010")).unwrap(),
            Lookup::Matched(_)
        ));
    }

    #[test]
    fn test_transport_failure_is_fatal() {
        let mut fetcher = StubFetcher::default();
        fetcher.unreachable.push(format!("{SEARCH}IU"));
        let reg = registry(fetcher);

        let err = reg.lookup(&NetworkYear::new("IU", "2010")).unwrap_err();
        assert!(err.is_fatal());
    }
}
