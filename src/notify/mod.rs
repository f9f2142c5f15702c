use crate::commands::CurrentApod;
use std::io;
use std::process::Command;
use tracing::info;

pub fn about_summary(title: &str, date: &str) -> String {
    format!("{title}. \nTaken in {date}")
}

/// Pop a desktop notification describing the current picture.
pub fn show_about(current: &CurrentApod) -> io::Result<()> {
    let summary = about_summary(&current.apod.title, &current.apod.date);

    let mut cmd = Command::new("notify-send");
    cmd.arg("--app-name=apodwall");
    if let Some(icon) = &current.image_path {
        cmd.arg("--icon").arg(icon);
    }
    cmd.arg(summary).arg(&current.apod.explanation);

    cmd.spawn().map(|_| ())
}

pub fn open_page(url: &str) -> io::Result<()> {
    info!("opening browser using URL: {url}");
    Command::new("xdg-open").arg(url).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_carries_title_and_date() {
        let s = about_summary("A Light Pillar over Whitby Abbey", "2019-01-09");
        assert_eq!(s, "A Light Pillar over Whitby Abbey. \nTaken in 2019-01-09");
    }
}
