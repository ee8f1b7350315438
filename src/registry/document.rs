// src/registry/document.rs
//
// The handful of HTML queries the registry pages need, on top of `scraper`.

use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

/// Text of an element with each fragment trimmed and the pieces joined.
fn stripped_text(el: &ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// `href` of every anchor, in document order.
    pub fn links(&self) -> Vec<&str> {
        let sel = selector("a[href]");
        self.html
            .select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .collect()
    }

    pub fn tables(&self) -> Vec<Table<'_>> {
        let sel = selector("table");
        self.html.select(&sel).map(Table).collect()
    }

    pub fn tables_with_class(&self, class: &str) -> Vec<Table<'_>> {
        let sel = selector(&format!("table.{}", class));
        self.html.select(&sel).map(Table).collect()
    }

    /// Tables whose full text contains `label`.
    pub fn tables_containing(&self, label: &str) -> Vec<Table<'_>> {
        self.tables()
            .into_iter()
            .filter(|t| t.contains(label))
            .collect()
    }
}

#[derive(Clone, Copy)]
pub struct Table<'a>(ElementRef<'a>);

impl<'a> Table<'a> {
    pub fn contains(&self, label: &str) -> bool {
        self.0.text().collect::<String>().contains(label)
    }

    /// `(th, td)` text pairs, row by row, for rows that carry both.
    pub fn fields(&self) -> Vec<(String, String)> {
        let (tr, th, td) = (selector("tr"), selector("th"), selector("td"));
        let mut out = Vec::new();
        for row in self.0.select(&tr) {
            let headers = row.select(&th).map(|h| stripped_text(&h));
            let values = row.select(&td).map(|d| stripped_text(&d));
            out.extend(headers.zip(values));
        }
        out
    }

    /// First anchor whose `href` contains `needle`.
    pub fn first_link_containing(&self, needle: &str) -> Option<&'a str> {
        let sel = selector("a[href]");
        self.0
            .select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <a href="/networks/">All networks</a>
          <a href="/networks/detail/IU/">IU</a>
          <a name="anchor-only">no href</a>
          <table class="network-information">
            <tr><th> FDSN code </th><td><b>IU</b></td></tr>
            <tr><th>Network name</th><td>Global   Seismograph
                Network</td></tr>
          </table>
          <table class="other">
            <tr><th>Digital Object Identifier (DOI)</th>
                <td><a href="/about/">about</a> <a href="https://doi.org/10.7914/SN/IU">doi</a></td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_links_in_order() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.links(),
            vec!["/networks/", "/networks/detail/IU/", "/about/", "https://doi.org/10.7914/SN/IU"]
        );
    }

    #[test]
    fn test_tables_by_class_and_label() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.tables().len(), 2);
        assert_eq!(doc.tables_with_class("network-information").len(), 1);

        let doi_tables = doc.tables_containing("Digital Object Identifier (DOI)");
        assert_eq!(doi_tables.len(), 1);
        assert_eq!(
            doi_tables[0].first_link_containing("doi.org"),
            Some("https://doi.org/10.7914/SN/IU")
        );
    }

    #[test]
    fn test_fields_strip_fragments() {
        let doc = Document::parse(PAGE);
        let fields = doc.tables_with_class("network-information")[0].fields();
        assert_eq!(fields[0], ("FDSN code".to_string(), "IU".to_string()));
        assert_eq!(fields[1].0, "Network name");
        assert!(fields[1].1.starts_with("Global   Seismograph"));
    }
}
