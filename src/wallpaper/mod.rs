use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::info;
use url::Url;

const SCHEMA: &str = "org.gnome.desktop.background";
// GNOME 42+ reads picture-uri-dark in dark style; older releases ignore it.
const KEYS: [&str; 2] = ["picture-uri", "picture-uri-dark"];

pub fn file_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(Into::into)
}

/// Point the GNOME desktop background at the given image file.
pub fn set_background(path: &Path) -> io::Result<()> {
    let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let uri = file_uri(&abs).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot build a file:// URI for {}", abs.display()),
        )
    })?;

    info!("setting wallpaper to use image: {}", abs.display());
    info!("picture-uri: {uri}");

    for key in KEYS {
        let status = gsettings_set(key, &uri)?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("gsettings set {SCHEMA} {key} exited with {status}"),
            ));
        }
    }

    Ok(())
}

fn gsettings_set(key: &str, value: &str) -> io::Result<ExitStatus> {
    Command::new("gsettings")
        .arg("set")
        .arg(SCHEMA)
        .arg(key)
        .arg(value)
        .status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn file_uri_is_percent_encoded() {
        let uri = file_uri(Path::new("/tmp/light pillar.jpg")).unwrap();
        assert_eq!(uri, "file:///tmp/light%20pillar.jpg");
    }

    #[test]
    fn plain_paths_pass_through() {
        let uri = file_uri(Path::new("/tmp/LightPillar_Dai_2048.jpg")).unwrap();
        assert_eq!(uri, "file:///tmp/LightPillar_Dai_2048.jpg");
    }

    #[test]
    fn relative_paths_have_no_uri() {
        assert!(file_uri(&PathBuf::from("relative/pic.jpg")).is_none());
    }
}
