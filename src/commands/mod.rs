use crate::apod::{self, Apod, ApodError};
use crate::config::Config;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// The last successfully fetched picture, shared with the tray menu.
#[derive(Debug, Clone)]
pub struct CurrentApod {
    pub apod: Apod,
    /// Where the image landed on disk. None on video days.
    pub image_path: Option<PathBuf>,
}

/// One full refresh: fetch metadata, download the image, point the desktop
/// background at it. Failures are logged; there is no retry.
pub async fn refresh_wallpaper(cfg: Config) -> Option<CurrentApod> {
    let client = match apod::client() {
        Ok(c) => c,
        Err(e) => {
            error!("failed to build HTTP client: {e}");
            return None;
        }
    };

    let picture = match apod::fetch_apod(&client, &cfg).await {
        Ok(p) => p,
        Err(e) => {
            error!("failed request to NASA: {e}");
            return None;
        }
    };
    info!("picture of the day: {} ({})", picture.title, picture.date);

    let image_path = match apod::download_image(&client, &picture, &cfg).await {
        Ok(p) => Some(p),
        Err(ApodError::NotAnImage(kind)) => {
            // Keep the metadata so About Image still works.
            warn!("today's entry is a {kind}; leaving the wallpaper alone");
            None
        }
        Err(e) => {
            error!("failed to download image: {e}");
            None
        }
    };

    if let Some(path) = image_path.clone() {
        let res =
            tokio::task::spawn_blocking(move || crate::wallpaper::set_background(&path)).await;
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("failed to set wallpaper: {e}"),
            Err(e) => error!("wallpaper task failed: {e}"),
        }
    }

    Some(CurrentApod {
        apod: picture,
        image_path,
    })
}
