//! GTK4 frontend that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                        (optionally borderless / fullscreen)
//! └ GtkGrid                    (homogeneous, spacing + padding from config)
//!     ├ GtkButton.board-cell.cell-0-0
//!     │   └ GtkBox             (icon above label, when an icon is set)
//!     └ …
//! ```
//!
//! Clicks are not dispatched from the signal handler.  They are sent into
//! the same event channel that stdin feeds, and a GLib timeout drains that
//! channel into the [`Board`].  The board answers state switches with
//! [`ViewEvent::Redraw`], which rebuilds the grid and reloads the
//! stylesheet.

use crate::board::{Board, Flow};
use crate::event::BoardEvent;
use crate::frontend::css::{cell_class, stylesheet};
use crate::traits::{BoardView, CellView, Launcher, ViewEvent};
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use log::{debug, error, info, warn};
use std::sync::mpsc;
use std::time::Duration;

const WINDOW_TITLE: &str = "VulcanBoard";
const DEFAULT_WIDTH: i32 = 800;
const DEFAULT_HEIGHT: i32 = 480;

/// Run the GTK4 main loop on the **current** (main) thread until the window
/// is closed or a `Quit` event arrives.
///
/// `event_tx` is handed to the button click handlers; `event_rx` is the
/// receiving end of the same channel.
pub fn run_main_loop<L: Launcher + 'static>(
    mut board: Board<L>,
    event_tx: mpsc::Sender<BoardEvent>,
    event_rx: mpsc::Receiver<BoardEvent>,
    force_fullscreen: bool,
) -> Result<(), glib::BoolError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    let provider = gtk4::CssProvider::new();
    match gdk::Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => warn!("no GDK display, button colours will not be applied"),
    }

    let config = board.config();
    let layout = config.layout();
    let window_settings = config.window();

    let window = gtk4::Window::new();
    window.set_title(Some(WINDOW_TITLE));
    window.set_default_size(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    window.set_decorated(!window_settings.borderless);
    if let Some(pos) = window_settings.position {
        warn!(
            "window_position ({}, {}) ignored: GTK4 does not let clients place windows",
            pos.x, pos.y
        );
    }

    let grid = gtk4::Grid::new();
    grid.set_row_spacing(layout.spacing);
    grid.set_column_spacing(layout.spacing);
    grid.set_row_homogeneous(true);
    grid.set_column_homogeneous(true);
    let padding = i32::try_from(layout.padding).unwrap_or(i32::MAX);
    grid.set_margin_start(padding);
    grid.set_margin_end(padding);
    grid.set_margin_top(padding);
    grid.set_margin_bottom(padding);
    window.set_child(Some(&grid));

    let (view_tx, view_rx) = mpsc::channel::<ViewEvent>();
    board.set_view_sink(view_tx);
    render(&grid, &provider, &board.view(), &event_tx);

    let main_loop = glib::MainLoop::new(None, false);
    {
        let main_loop = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("window closed");
            main_loop.quit();
            glib::Propagation::Proceed
        });
    }

    if force_fullscreen || window_settings.fullscreen {
        window.fullscreen();
    }
    window.present();
    info!(
        "showing state {:?} ({}x{})",
        board.active_state().name(),
        board.config().rows(),
        board.config().columns()
    );

    //  Event loop (~60 fps)
    {
        let main_loop = main_loop.clone();
        let window = window.clone();
        glib::timeout_add_local(Duration::from_millis(16), move || {
            // 1. Drain board events.
            while let Ok(event) = event_rx.try_recv() {
                match board.handle(event) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => {
                        info!("quit requested");
                        window.close();
                        main_loop.quit();
                        return glib::ControlFlow::Break;
                    }
                    Err(e) => error!("event error: {}", e),
                }
            }

            // 2. Redraw after state switches; only the latest view matters.
            if let Some(ViewEvent::Redraw(view)) = view_rx.try_iter().last() {
                debug!("redraw for state {:?}", view.state);
                render(&grid, &provider, &view, &event_tx);
            }

            glib::ControlFlow::Continue
        });
    }

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

/// Replace the grid's children with widgets for `view`.
fn render(
    grid: &gtk4::Grid,
    provider: &gtk4::CssProvider,
    view: &BoardView,
    event_tx: &mpsc::Sender<BoardEvent>,
) {
    while let Some(child) = grid.first_child() {
        grid.remove(&child);
    }

    #[allow(deprecated)]
    provider.load_from_data(&stylesheet(view));

    for cell in &view.cells {
        let button = cell_widget(cell);
        if cell.actionable {
            let tx = event_tx.clone();
            let position = cell.position;
            button.connect_clicked(move |_| {
                if tx.send(BoardEvent::Press(position)).is_err() {
                    warn!("board is gone, dropping press at {}", position);
                }
            });
        }
        grid.attach(
            &button,
            cell.position.col as i32,
            cell.position.row as i32,
            1,
            1,
        );
    }
}

fn cell_widget(cell: &CellView) -> gtk4::Button {
    let button = gtk4::Button::new();
    button.add_css_class("board-cell");
    button.add_css_class(&cell_class(cell.position));
    if !cell.populated {
        button.add_css_class("empty");
    } else if !cell.actionable {
        button.add_css_class("inert");
    }
    button.set_hexpand(true);
    button.set_vexpand(true);

    let label = gtk4::Label::new(Some(&cell.label));
    label.set_wrap(true);
    label.set_justify(gtk4::Justification::Center);

    match cell.icon {
        Some(ref icon) => {
            let content = gtk4::Box::new(gtk4::Orientation::Vertical, 4);
            let image = gtk4::Image::from_file(icon);
            image.set_vexpand(true);
            content.append(&image);
            if !cell.label.is_empty() {
                content.append(&label);
            }
            button.set_child(Some(&content));
        }
        None => button.set_child(Some(&label)),
    }
    button
}
