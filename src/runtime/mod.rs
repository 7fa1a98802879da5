use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::cart::{CartManager, MarkupContainer};
use crate::handoff::SystemOpener;
use crate::notify::Notifier;

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run(music_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = settings::load_settings();
    let settings = &loaded.settings;
    let _log_guard = logging::init_logging(settings);
    loaded.report();

    let mut app = startup::build_app(settings, music_dir)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    run_result
}

/// Write the persisted cart to stdout as checkout-table markup.
pub fn print_cart() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = settings::load_settings();
    let settings = &loaded.settings;
    let _log_guard = logging::init_logging(settings);
    loaded.report();

    let store = startup::open_store(settings)?;
    let cart = CartManager::new(
        store,
        settings.shop.clone(),
        Notifier::default(),
        Box::new(SystemOpener),
    );
    let mut container = MarkupContainer::default();
    cart.render(&mut container);
    println!("{}", container.markup());
    Ok(())
}
