mod apod;
mod commands;
mod config;
mod notify;
mod tray;
mod wallpaper;

use tracing::error;
use tracing_subscriber::EnvFilter;

enum Mode {
    Tray,
    Refresh,
}

fn parse_args() -> Result<Mode, String> {
    let mut args = std::env::args().skip(1);

    let mut selected: Option<Mode> = None;

    while let Some(arg) = args.next() {
        let next_mode = match arg.as_str() {
            "--refresh" => Mode::Refresh,
            "--help" | "-h" => {
                return Err(
                    "Usage:\n  apodwall [--refresh]\n\nWithout arguments apodwall starts the tray applet.\n"
                        .to_string(),
                );
            }
            _ => {
                return Err(format!("Unknown argument: {arg}"));
            }
        };

        if selected.is_some() {
            return Err("Only one mode can be specified".to_string());
        }

        selected = Some(next_mode);
    }

    Ok(selected.unwrap_or(Mode::Tray))
}

fn run_async<F>(f: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build();

    match rt {
        Ok(rt) => rt.block_on(f),
        Err(e) => error!("failed to build tokio runtime: {e}"),
    }
}

fn enforce_single_instance() -> Result<(), String> {
    let inst = single_instance::SingleInstance::new("apodwall-tray")
        .map_err(|e| format!("{e}"))?;
    if !inst.is_single() {
        return Err("already-running".into());
    }

    std::mem::forget(inst);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apodwall=info")),
        )
        .init();

    let mode = match parse_args() {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{msg}");
            return;
        }
    };

    match mode {
        Mode::Refresh => {
            let cfg = config::load_or_create_config();
            run_async(async move {
                if commands::refresh_wallpaper(cfg).await.is_none() {
                    error!("refresh failed; wallpaper unchanged");
                }
            });
        }
        Mode::Tray => {
            if let Err(e) = enforce_single_instance() {
                if e == "already-running" {
                    eprintln!("apodwall is already running.");
                    return;
                } else {
                    eprintln!(
                        "Warning: Unable to enforce single-instance (continuing anyway): {}",
                        e
                    );
                }
            }

            let cfg = config::load_or_create_config();
            tray::run(cfg);
        }
    }
}
