use crate::config::Config;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";
const APOD_PAGE_BASE: &str = "https://apod.nasa.gov/apod";

/// One picture-of-the-day entry as returned by the NASA API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Apod {
    pub title: String,
    /// YYYY-MM-DD, the publication date on apod.nasa.gov.
    pub date: String,
    pub explanation: String,
    pub url: String,
    #[serde(default)]
    pub hdurl: Option<String>,
    #[serde(default = "default_media_type")]
    pub media_type: String,
    #[serde(default)]
    pub copyright: Option<String>,
}

fn default_media_type() -> String {
    String::from("image")
}

#[derive(Debug, thiserror::Error)]
pub enum ApodError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("NASA API answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("NASA API returned an empty batch")]
    EmptyBatch,
    #[error("picture of the day is a {0}, not an image")]
    NotAnImage(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub fn client() -> Result<reqwest::Client, ApodError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("apodwall/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fetch the picture-of-the-day metadata.
///
/// With `count=1` the API picks one random archive entry and wraps it in an
/// array; without it, it returns today's entry as a bare object.
pub async fn fetch_apod(client: &reqwest::Client, cfg: &Config) -> Result<Apod, ApodError> {
    let mut api_url = format!(
        "{}?api_key={}",
        APOD_ENDPOINT,
        urlencoding::encode(cfg.api_key.trim())
    );
    if cfg.random {
        api_url.push_str("&count=1");
    }

    let resp = client.get(&api_url).send().await?;
    if !resp.status().is_success() {
        return Err(ApodError::Status(resp.status()));
    }

    let apod = if cfg.random {
        let mut batch: Vec<Apod> = resp.json().await?;
        if batch.is_empty() {
            return Err(ApodError::EmptyBatch);
        }
        batch.swap_remove(0)
    } else {
        resp.json().await?
    };

    debug!(?apod, "metadata received");
    Ok(apod)
}

/// The image URL to download, honoring the hd preference.
pub fn image_url<'a>(apod: &'a Apod, prefer_hd: bool) -> &'a str {
    match (&apod.hdurl, prefer_hd) {
        (Some(hd), true) => hd,
        _ => &apod.url,
    }
}

/// The page on apod.nasa.gov describing this entry, derived from its date.
/// Dates the archive format can't express fall back to the rolling page.
pub fn page_url(apod: &Apod) -> String {
    match NaiveDate::parse_from_str(&apod.date, "%Y-%m-%d") {
        Ok(d) => format!("{}/ap{}.html", APOD_PAGE_BASE, d.format("%y%m%d")),
        Err(_) => format!("{}/astropix.html", APOD_PAGE_BASE),
    }
}

/// Download the image into `cfg.download_dir`, returning the saved path.
/// Video days carry no image to download and leave the disk untouched.
pub async fn download_image(
    client: &reqwest::Client,
    apod: &Apod,
    cfg: &Config,
) -> Result<PathBuf, ApodError> {
    if apod.media_type != "image" {
        return Err(ApodError::NotAnImage(apod.media_type.clone()));
    }

    let img_url = image_url(apod, cfg.prefer_hd);

    fs::create_dir_all(&cfg.download_dir)?;
    let filename = file_name_from_url(img_url).unwrap_or_else(|| String::from("apod.jpg"));
    let dest_path = cfg.download_dir.join(filename);

    info!("downloading image {} from {}", dest_path.display(), img_url);

    let mut img_resp = client.get(img_url).send().await?;
    if !img_resp.status().is_success() {
        return Err(ApodError::Status(img_resp.status()));
    }

    let mut file = fs::File::create(&dest_path)?;
    while let Some(chunk) = img_resp.chunk().await? {
        file.write_all(&chunk)?;
    }

    info!("download successful, saved to {}", dest_path.display());
    Ok(dest_path)
}

fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()
        .and_then(|segs| segs.last())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "copyright": "Jeff Dai",
        "date": "2019-01-09",
        "explanation": "Why is there a tower of light appearing over Whitby Abbey?",
        "hdurl": "https://apod.nasa.gov/apod/image/1901/LightPillar_Dai_2048.jpg",
        "media_type": "image",
        "service_version": "v1",
        "title": "A Light Pillar over Whitby Abbey",
        "url": "https://apod.nasa.gov/apod/image/1901/LightPillar_Dai_1024.jpg"
    }"#;

    #[test]
    fn deserializes_a_single_entry() {
        let apod: Apod = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(apod.title, "A Light Pillar over Whitby Abbey");
        assert_eq!(apod.date, "2019-01-09");
        assert_eq!(apod.media_type, "image");
        assert_eq!(apod.copyright.as_deref(), Some("Jeff Dai"));
        assert!(apod.hdurl.is_some());
    }

    #[test]
    fn deserializes_a_count_batch() {
        let batch: Vec<Apod> = serde_json::from_str(&format!("[{SAMPLE}]")).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn missing_optional_fields_are_tolerated() {
        let apod: Apod = serde_json::from_str(
            r#"{"title":"t","date":"2024-02-29","explanation":"e","url":"https://example.com/a.jpg"}"#,
        )
        .unwrap();
        assert!(apod.hdurl.is_none());
        assert!(apod.copyright.is_none());
        assert_eq!(apod.media_type, "image");
    }

    #[test]
    fn hd_is_preferred_when_present() {
        let apod: Apod = serde_json::from_str(SAMPLE).unwrap();
        assert!(image_url(&apod, true).ends_with("_2048.jpg"));
        assert!(image_url(&apod, false).ends_with("_1024.jpg"));
    }

    #[test]
    fn falls_back_to_url_without_hd() {
        let mut apod: Apod = serde_json::from_str(SAMPLE).unwrap();
        apod.hdurl = None;
        assert!(image_url(&apod, true).ends_with("_1024.jpg"));
    }

    #[test]
    fn page_url_uses_the_short_date_form() {
        let apod: Apod = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(page_url(&apod), "https://apod.nasa.gov/apod/ap190109.html");
    }

    #[test]
    fn unparseable_date_goes_to_the_rolling_page() {
        let mut apod: Apod = serde_json::from_str(SAMPLE).unwrap();
        apod.date = String::from("someday");
        assert_eq!(page_url(&apod), "https://apod.nasa.gov/apod/astropix.html");
    }

    #[test]
    fn filename_is_the_last_path_segment() {
        assert_eq!(
            file_name_from_url("https://apod.nasa.gov/apod/image/1901/LightPillar_Dai_2048.jpg"),
            Some(String::from("LightPillar_Dai_2048.jpg"))
        );
        assert_eq!(file_name_from_url("https://apod.nasa.gov/apod/"), None);
        assert_eq!(file_name_from_url("not a url"), None);
    }
}
