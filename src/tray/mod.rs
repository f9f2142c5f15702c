use crate::commands::{self, CurrentApod};
use crate::config::Config;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIconBuilder};

const TOOLTIP: &str = "Daily NASA Background Image";

#[derive(Debug, Clone, Copy)]
enum TrayCommand {
    AboutImage,
    OpenPage,
    Refresh,
    Quit,
}

fn build_icon() -> Icon {
    let size: u32 = 22;
    let mut rgba = vec![0u8; (size * size * 4) as usize];

    // A plain NASA-blue disc; close enough for a 22px status icon.
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            if dx * dx + dy * dy <= radius * radius {
                let i = ((y * size + x) * 4) as usize;
                rgba[i] = 11; // R
                rgba[i + 1] = 61; // G
                rgba[i + 2] = 145; // B
                rgba[i + 3] = 255; // A
            }
        }
    }
    Icon::from_rgba(rgba, size, size).expect("failed to create tray icon")
}

/// Run the status icon. Blocks on the GTK main loop; menu events are handled
/// by the callback installed below.
pub fn run(cfg: Config) {
    gtk::init().expect("failed to initialize GTK");

    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime"),
    );

    let current: Arc<Mutex<Option<CurrentApod>>> = Arc::new(Mutex::new(None));

    let menu = Menu::new();
    let about_item = MenuItem::new("About Image", true, None);
    let page_item = MenuItem::new("Open APOD Page", true, None);
    let refresh_item = MenuItem::new("Refresh Image", true, None);
    let quit_item = MenuItem::new("Quit", true, None);

    menu.append(&about_item).unwrap();
    menu.append(&page_item).unwrap();
    menu.append(&PredefinedMenuItem::separator()).unwrap();
    menu.append(&refresh_item).unwrap();
    menu.append(&PredefinedMenuItem::separator()).unwrap();
    menu.append(&quit_item).unwrap();

    let _tray = TrayIconBuilder::new()
        .with_icon(build_icon())
        .with_tooltip(TOOLTIP)
        .with_menu(Box::new(menu))
        .build()
        .expect("failed to build tray icon");

    // The applet fetches once on startup, same as clicking Refresh.
    {
        let cfg = cfg.clone();
        let current = Arc::clone(&current);
        rt.spawn(async move {
            if let Some(fresh) = commands::refresh_wallpaper(cfg).await {
                *current.lock().unwrap() = Some(fresh);
            }
        });
    }

    let about_id = about_item.id().clone();
    let page_id = page_item.id().clone();
    let refresh_id = refresh_item.id().clone();
    let quit_id = quit_item.id().clone();

    let id_to_cmd = move |id: &_| -> Option<TrayCommand> {
        if *id == about_id {
            Some(TrayCommand::AboutImage)
        } else if *id == page_id {
            Some(TrayCommand::OpenPage)
        } else if *id == refresh_id {
            Some(TrayCommand::Refresh)
        } else if *id == quit_id {
            Some(TrayCommand::Quit)
        } else {
            None
        }
    };

    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        let Some(cmd) = id_to_cmd(&event.id) else {
            return;
        };

        match cmd {
            TrayCommand::AboutImage => match current.lock().unwrap().as_ref() {
                Some(cur) => {
                    if let Err(e) = crate::notify::show_about(cur) {
                        error!("failed to show notification: {e}");
                    }
                }
                None => warn!("no APOD fetched yet"),
            },
            TrayCommand::OpenPage => match current.lock().unwrap().as_ref() {
                Some(cur) => {
                    let url = crate::apod::page_url(&cur.apod);
                    if let Err(e) = crate::notify::open_page(&url) {
                        error!("failed to open browser: {e}");
                    }
                }
                None => warn!("no APOD fetched yet"),
            },
            TrayCommand::Refresh => {
                let cfg = cfg.clone();
                let current = Arc::clone(&current);

                rt.spawn(async move {
                    match commands::refresh_wallpaper(cfg).await {
                        Some(fresh) => {
                            *current.lock().unwrap() = Some(fresh);
                        }
                        None => error!("refresh failed; wallpaper unchanged"),
                    }
                });
            }
            TrayCommand::Quit => {
                std::process::exit(0);
            }
        }
    }));

    // Blocks forever; menu events arrive through the handler above.
    gtk::main();
}
