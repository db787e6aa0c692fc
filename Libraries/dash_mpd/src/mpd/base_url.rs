use serde::Serialize;
use url::Url;

use crate::error::DashError;
use crate::xml::XmlElement;

/// One selectable root for segment URLs. Several MPD-level BaseURLs ("CDN alternates") give
/// several options; otherwise the manifest's own directory is the only one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseOption {
    pub url: String,
    pub label: String,
}

/// The directory the manifest was served from: query and fragment dropped, file name
/// stripped. Unparseable input is returned as-is.
pub fn manifest_directory(manifest_url: &str) -> String {
    match Url::parse(manifest_url) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            match url.join("./") {
                Ok(dir) => dir.into(),
                Err(_) => url.into(),
            }
        }
        Err(_) => manifest_url.to_string(),
    }
}

/// Resolves `reference` against `base`, falling back to the reference text when either side
/// is not a usable URL.
pub fn resolve_reference(base: &str, reference: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

/// Non-empty BaseURL texts directly under `element`, with their `serviceLocation`.
pub fn base_urls(element: &XmlElement) -> impl Iterator<Item = (&str, Option<&str>)> {
    element
        .children_named("BaseURL")
        .map(|b| (b.trimmed_text(), b.attr("serviceLocation")))
        .filter(|(url, _)| !url.is_empty())
}

/// The first BaseURL of a scope, which is the one used below the MPD level.
pub fn first_base_url(element: &XmlElement) -> Option<&str> {
    base_urls(element).next().map(|(url, _)| url)
}

/// Builds the selectable roots from the MPD-level BaseURLs, de-duplicated in document order.
pub fn base_options(mpd: &XmlElement, manifest_url: &str) -> Vec<BaseOption> {
    let directory = manifest_directory(manifest_url);
    let mut options: Vec<BaseOption> = Vec::new();
    for (text, service_location) in base_urls(mpd) {
        let url = resolve_reference(&directory, text);
        if options.iter().any(|o| o.url == url) {
            continue;
        }
        let label = service_location.filter(|l| !l.is_empty()).unwrap_or(text).to_string();
        options.push(BaseOption { url, label });
    }
    if options.is_empty() {
        options.push(BaseOption { url: directory.clone(), label: directory });
    }
    options
}

/// Applies `parts` in order on top of `root`, each relative to the previous result.
pub fn compose(root: &str, parts: &[String]) -> Result<Url, DashError> {
    let mut url = Url::parse(root).map_err(|source| DashError::InvalidUrl { url: root.to_string(), source })?;
    for part in parts {
        url = url.join(part).map_err(|source| DashError::InvalidUrl { url: part.clone(), source })?;
    }
    Ok(url)
}
