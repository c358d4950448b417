use crate::error::{ProcessingError, Result};
use crate::fetchers::selector;
use crate::models::Station;
use reqwest::Url;
use scraper::{ElementRef, Html};
use tracing::debug;
use validator::Validate;

/// Extract the station list from the directory page.
///
/// The first row is a header. Every later row with a link yields a station whose id
/// is the `f` query parameter of that link and whose name is the third cell.
pub fn parse_station_directory(html: &str, page_url: &str) -> Result<Vec<Station>> {
    let base = Url::parse(page_url).map_err(|e| ProcessingError::Fetch {
        url: page_url.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let link_selector = selector("a[href]")?;
    let cell_selector = selector("td")?;

    let mut stations = Vec::new();
    for row in document.select(&row_selector).skip(1) {
        let Some(href) = row
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let Some(id) = station_id(&base, href) else {
            debug!(href, "directory link without station id");
            continue;
        };

        let name = row
            .select(&cell_selector)
            .nth(2)
            .map(cell_text)
            .unwrap_or_default();

        let station = Station::new(id, name);
        if let Err(e) = station.validate() {
            debug!(href, error = %e, "skipping incomplete directory row");
            continue;
        }
        stations.push(station);
    }

    Ok(stations)
}

fn station_id(base: &Url, href: &str) -> Option<String> {
    let link = base.join(href).ok()?;
    link.query_pairs()
        .find(|(key, _)| key == "f")
        .map(|(_, value)| value.trim().to_string())
}

/// Whitespace-collapsed text content of a cell
pub(crate) fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
